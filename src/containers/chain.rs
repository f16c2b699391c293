type Link<T> = Option<Box<Node<T>>>;

struct Node<T> {
    value: T,
    next: Link<T>,
}

/// Singly-linked chain of owned nodes, top first.
///
/// Tracks its own length so that `len` stays O(1). Both stacks are thin
/// wrappers around it.
pub(crate) struct Chain<T> {
    top: Link<T>,
    size: usize,
}

impl<T> Chain<T> {
    pub(crate) const fn new() -> Self {
        Chain { top: None, size: 0 }
    }

    pub(crate) const fn len(&self) -> usize {
        self.size
    }

    pub(crate) fn push_front(&mut self, value: T) {
        let next = self.top.take();
        self.top = Some(Box::new(Node { value, next }));
        self.size += 1;
    }

    pub(crate) fn pop_front(&mut self) -> Option<T> {
        let node = self.top.take()?;
        let Node { value, next } = *node;
        self.top = next;
        self.size -= 1;
        Some(value)
    }

    /// Detaches the bottommost node.
    ///
    /// Walks down to the node two-from-bottom and cuts its successor off.
    /// With fewer than two nodes there is no such node and nothing is
    /// removed.
    pub(crate) fn pop_back(&mut self) -> Option<T> {
        if self.size < 2 {
            return None;
        }

        let Some(mut cursor) = self.top.as_deref_mut() else {
            return None;
        };

        // not second-to-last while the successor still has a child
        while cursor.next.as_ref().is_some_and(|next| next.next.is_some()) {
            let Some(next) = cursor.next.as_deref_mut() else {
                return None;
            };
            cursor = next;
        }

        let bottom = cursor.next.take()?;
        self.size -= 1;
        Some(bottom.value)
    }

    pub(crate) fn peek(&self) -> Option<&T> {
        self.top.as_deref().map(|node| &node.value)
    }

    pub(crate) fn peek_n(&self, n: usize) -> Vec<&T> {
        self.iter().take(n).collect()
    }

    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.top.as_deref(),
        }
    }
}

impl<T> Drop for Chain<T> {
    fn drop(&mut self) {
        let mut link = self.top.take();
        while let Some(mut node) = link {
            link = node.next.take();
        }
    }
}

pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.value
        })
    }
}
