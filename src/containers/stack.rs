use super::chain::{Chain, Iter};

/// An unbounded LIFO stack.
pub struct Stack<T> {
    chain: Chain<T>,
}

impl<T> Stack<T> {
    pub const fn new() -> Self {
        Stack {
            chain: Chain::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.len() == 0
    }

    pub fn push(&mut self, value: T) {
        self.chain.push_front(value)
    }

    /// Removes the topmost element, or returns `None` if the stack is empty.
    pub fn pop(&mut self) -> Option<T> {
        self.chain.pop_front()
    }

    /// Removes the bottommost element.
    ///
    /// Does nothing unless the stack holds at least 2 elements.
    pub fn pop_last(&mut self) -> Option<T> {
        self.chain.pop_back()
    }

    pub fn peek(&self) -> Option<&T> {
        self.chain.peek()
    }

    /// Returns at most the `n` topmost elements without removing them.
    pub fn peek_n(&self, n: usize) -> Vec<&T> {
        self.chain.peek_n(n)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.chain.iter()
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for Stack<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}
