use core::fmt;
use core::num::NonZeroUsize;

use thiserror::Error;
use tracing::{debug, error, trace};

use super::chain::{Chain, Iter};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CapacityError {
    #[error("bounded stack capacity must be at least 1")]
    ZeroCapacity,
}

/// A capacity-limited LIFO stack.
///
/// Pushing onto a full stack never fails: the bottommost (oldest) element
/// is evicted first to make room. Eviction walks the whole chain, so it is
/// O(n), while `push` on a non-full stack, `pop` and `peek` are O(1).
///
/// The stack does no internal synchronization. Wrap it in a mutex to share
/// it between threads.
pub struct BoundedStack<T> {
    chain: Chain<T>,
    max: usize,
}

impl<T> BoundedStack<T> {
    /// Creates an empty stack holding at most `max` elements.
    ///
    /// Returns [`CapacityError::ZeroCapacity`] if `max` is 0.
    pub fn new(max: usize) -> Result<Self, CapacityError> {
        let max = NonZeroUsize::new(max).ok_or(CapacityError::ZeroCapacity)?;
        Ok(Self::with_capacity(max))
    }

    pub fn with_capacity(max: NonZeroUsize) -> Self {
        debug!(max = max.get(), "creating bounded stack");
        BoundedStack {
            chain: Chain::new(),
            max: max.get(),
        }
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.len() == 0
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Pushes `value` on top of the stack.
    ///
    /// If this would make the stack grow past its capacity, the bottommost
    /// element is dropped first.
    ///
    /// # Panics
    ///
    /// Panics if the stack is full but no bottom element can be found,
    /// which means the chain and its length disagree.
    pub fn push(&mut self, value: T) {
        if self.chain.len() + 1 > self.max && self.evict().is_none() {
            error!(
                len = self.chain.len(),
                max = self.max,
                "full bounded stack has no bottom element"
            );
            panic!("unexpected empty eviction in a full bounded stack");
        }
        self.chain.push_front(value);
    }

    /// Removes the topmost element, or returns `None` if the stack is empty.
    pub fn pop(&mut self) -> Option<T> {
        self.chain.pop_front()
    }

    /// Removes the bottommost element.
    ///
    /// Does nothing and returns `None` unless the stack holds at least 2
    /// elements.
    pub fn pop_last(&mut self) -> Option<T> {
        self.chain.pop_back()
    }

    /// Returns the topmost element without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.chain.peek()
    }

    /// Returns at most `n` elements, topmost first, without removing them.
    pub fn peek_n(&self, n: usize) -> Vec<&T> {
        self.chain.peek_n(n)
    }

    /// Iterates from the top of the stack to the bottom.
    pub fn iter(&self) -> Iter<'_, T> {
        self.chain.iter()
    }

    // A capacity-1 stack has no second-to-bottom node, its only element is
    // also the top.
    fn evict(&mut self) -> Option<T> {
        let evicted = match self.chain.len() {
            1 => self.chain.pop_front(),
            _ => self.chain.pop_back(),
        };
        if evicted.is_some() {
            trace!(max = self.max, "evicted bottom of bounded stack");
        }
        evicted
    }
}

impl<T: fmt::Debug> fmt::Debug for BoundedStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedStack")
            .field("max", &self.max)
            .field("elements", &DebugList(self))
            .finish()
    }
}

struct DebugList<'a, T>(&'a BoundedStack<T>);

impl<T: fmt::Debug> fmt::Debug for DebugList<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(max: usize, values: impl IntoIterator<Item = i32>) -> BoundedStack<i32> {
        let mut stack = BoundedStack::new(max).unwrap();
        for value in values {
            stack.push(value);
        }
        stack
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let res = BoundedStack::<u8>::new(0);
        assert_eq!(res.unwrap_err(), CapacityError::ZeroCapacity);
    }

    #[test]
    fn push_pop_peek() {
        let mut stack = BoundedStack::new(4).unwrap();
        assert_eq!(None, stack.peek());
        assert_eq!(None, stack.pop());

        stack.push("a");
        stack.push("b");
        assert_eq!(Some(&"b"), stack.peek());
        assert_eq!(2, stack.len());
        assert_eq!(4, stack.max());

        assert_eq!(Some("b"), stack.pop());
        assert_eq!(Some("a"), stack.pop());
        assert_eq!(None, stack.pop());
        assert!(stack.is_empty());
    }

    #[test]
    fn keeps_the_last_k_pushes() {
        const K: usize = 5;
        let mut stack = filled(K, 0..23);

        assert_eq!(K, stack.len());
        assert_eq!(Some(&22), stack.peek());

        for expected in (18..23).rev() {
            assert_eq!(Some(expected), stack.pop());
        }
        assert_eq!(None, stack.pop());
    }

    #[test]
    fn overflow_evicts_the_oldest() {
        let mut stack = filled(3, [1, 2, 3, 4]);

        assert_eq!(3, stack.len());
        let remaining: Vec<i32> = core::iter::from_fn(|| stack.pop()).collect();
        assert_eq!(vec![4, 3, 2], remaining);
        assert!(!remaining.contains(&1));
    }

    #[test]
    fn capacity_one_keeps_the_newest() {
        let mut stack = filled(1, [7, 8, 9]);
        assert_eq!(1, stack.len());
        assert_eq!(Some(&9), stack.peek());
        assert_eq!(Some(9), stack.pop());
        assert_eq!(None, stack.pop());
    }

    #[test]
    fn pop_last_needs_two_elements() {
        let mut stack = filled(4, []);
        assert_eq!(None, stack.pop_last());
        assert_eq!(0, stack.len());

        stack.push(1);
        assert_eq!(None, stack.pop_last());
        assert_eq!(1, stack.len());
        assert_eq!(Some(&1), stack.peek());
    }

    #[test]
    fn pop_last_keeps_order() {
        let mut stack = filled(8, [1, 2, 3, 4, 5]);

        assert_eq!(Some(1), stack.pop_last());
        assert_eq!(4, stack.len());
        assert_eq!(vec![&5, &4, &3, &2], stack.iter().collect::<Vec<_>>());

        assert_eq!(Some(2), stack.pop_last());
        assert_eq!(vec![&5, &4, &3], stack.peek_n(10));
    }

    #[test]
    fn evicted_values_are_dropped() {
        use std::rc::Rc;

        let token = Rc::new(());
        let mut stack = BoundedStack::new(2).unwrap();
        for _ in 0..6 {
            stack.push(Rc::clone(&token));
        }
        assert_eq!(3, Rc::strong_count(&token));

        drop(stack);
        assert_eq!(1, Rc::strong_count(&token));
    }

    #[test]
    fn debug_lists_top_first() {
        let stack = filled(3, [1, 2]);
        assert_eq!(
            "BoundedStack { max: 3, elements: [2, 1] }",
            format!("{:?}", stack)
        );
    }
}
