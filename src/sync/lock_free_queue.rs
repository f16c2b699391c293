use core::fmt;
use core::iter::FusedIterator;
use core::mem::MaybeUninit;
use core::ptr;
use core::sync::atomic::Ordering::{Acquire, Relaxed, Release};

use crossbeam_epoch::{self as epoch, Atomic, Guard, Owned, Shared};
use portable_atomic::AtomicIsize;
use tracing::{debug, trace};

struct Node<T> {
    // Uninitialized in the dummy node, and again once the value has been
    // moved out by the dequeue that turned this node into the dummy.
    value: MaybeUninit<T>,
    next: Atomic<Node<T>>,
}

impl<T> Node<T> {
    fn sentinel() -> Self {
        Node {
            value: MaybeUninit::uninit(),
            next: Atomic::null(),
        }
    }

    fn new(value: T) -> Self {
        Node {
            value: MaybeUninit::new(value),
            next: Atomic::null(),
        }
    }
}

/// A *lock-free* multi-producer multi-consumer unbounded queue.
///
/// The algorithm is taken from the paper: [*Simple, Fast, and Practical
/// Non-Blocking and Blocking Concurrent Queue Algorithms*](https://www.cs.rochester.edu/~scott/papers/1996_PODC_queues.pdf).
///
/// `dummy` points to the node right before the logical front of the queue.
/// `tail` points to the last node or lags behind it while an enqueue is
/// half done. Any thread that sees the lag moves `tail` forward itself.
///
/// # Memory reclamation
///
/// A dequeue retires the old dummy while other threads may still be
/// reading it. Nodes are therefore handed to [`crossbeam_epoch`], which
/// frees a retired node only once every thread that was pinned when it got
/// retired has unpinned.
pub struct LockFreeQueue<T> {
    dummy: Atomic<Node<T>>,
    tail: Atomic<Node<T>>,
    len: AtomicIsize,
}

unsafe impl<T: Send> Send for LockFreeQueue<T> {}
unsafe impl<T: Send> Sync for LockFreeQueue<T> {}

impl<T> LockFreeQueue<T> {
    pub fn new() -> Self {
        let queue = LockFreeQueue {
            dummy: Atomic::null(),
            tail: Atomic::null(),
            len: AtomicIsize::new(0),
        };

        // Not shared with any other thread yet.
        unsafe {
            let guard = epoch::unprotected();
            let sentinel = Owned::new(Node::sentinel()).into_shared(guard);
            queue.dummy.store(sentinel, Relaxed);
            queue.tail.store(sentinel, Relaxed);
        }

        debug!("created lock-free queue");
        queue
    }

    /// Places `value` at the back of the queue.
    ///
    /// Safe to call from any number of threads at once.
    pub fn enqueue(&self, value: T) {
        let guard = &epoch::pin();
        let node = Owned::new(Node::new(value)).into_shared(guard);

        loop {
            let tail = self.tail.load(Acquire, guard);
            // A concurrent dequeue may retire this node, but the guard keeps
            // it alive until we unpin.
            let tail_node = unsafe { tail.deref() };
            let next = tail_node.next.load(Acquire, guard);

            if tail != self.tail.load(Acquire, guard) {
                continue;
            }

            if !next.is_null() {
                trace!("tail is stale, advancing it before linking");
                let _ = self.tail.compare_exchange(tail, next, Release, Relaxed, guard);
                continue;
            }

            if tail_node
                .next
                .compare_exchange(Shared::null(), node, Release, Relaxed, guard)
                .is_ok()
            {
                // Single attempt. If it fails, the next operation to see
                // the lag finishes the job.
                let _ = self.tail.compare_exchange(tail, node, Release, Relaxed, guard);
                break;
            }
        }

        self.len.fetch_add(1, Relaxed);
    }

    /// Removes the value at the front of the queue.
    ///
    /// Returns `None` as soon as the queue is observed empty, even if an
    /// enqueue is about to complete. Safe to call from any number of
    /// threads at once.
    pub fn dequeue(&self) -> Option<T> {
        self.dequeue_with(&epoch::pin())
    }

    fn dequeue_with(&self, guard: &Guard) -> Option<T> {
        loop {
            let dummy = self.dummy.load(Acquire, guard);
            // The dummy is retired only after `self.dummy` moved past it,
            // and the guard keeps it alive until we unpin.
            let dummy_node = unsafe { dummy.deref() };
            let front = dummy_node.next.load(Acquire, guard);
            let tail = self.tail.load(Acquire, guard);

            if dummy != self.dummy.load(Acquire, guard) {
                continue;
            }

            let front_node = match unsafe { front.as_ref() } {
                Some(node) => node,
                None => return None,
            };

            if tail == dummy {
                trace!("tail lags behind a linked node, advancing it");
                let _ = self.tail.compare_exchange(tail, front, Release, Relaxed, guard);
                continue;
            }

            if self
                .dummy
                .compare_exchange(dummy, front, Release, Relaxed, guard)
                .is_ok()
            {
                self.len.fetch_sub(1, Relaxed);

                // Only the thread whose CAS won reads the value, and the
                // front node is now the dummy so nobody reads it again.
                unsafe {
                    guard.defer_destroy(dummy);
                    return Some(ptr::read(front_node.value.as_ptr()));
                }
            }
        }
    }

    /// Returns an iterator that dequeues until the queue is observed empty.
    ///
    /// This consumes values. Running it next to other consumers splits the
    /// values between them.
    pub fn iterate(&self) -> Drain<'_, T> {
        Drain {
            queue: self,
            exhausted: false,
        }
    }

    /// Number of values in the queue.
    ///
    /// Only exact when no enqueue or dequeue is in flight.
    pub fn len(&self) -> usize {
        self.len.load(Relaxed).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        let guard = &epoch::pin();
        let dummy = self.dummy.load(Acquire, guard);
        unsafe { dummy.deref() }.next.load(Acquire, guard).is_null()
    }
}

impl<T> Default for LockFreeQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for LockFreeQueue<T> {
    fn drop(&mut self) {
        // `&mut self`: no other thread can hold a reference.
        unsafe {
            let guard = epoch::unprotected();
            while self.dequeue_with(guard).is_some() {}

            let sentinel = self.dummy.load(Relaxed, guard);
            drop(sentinel.into_owned());
        }
    }
}

impl<T> fmt::Debug for LockFreeQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockFreeQueue")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// Draining iterator returned by [`LockFreeQueue::iterate`].
pub struct Drain<'a, T> {
    queue: &'a LockFreeQueue<T>,
    exhausted: bool,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.exhausted {
            return None;
        }
        let value = self.queue.dequeue();
        self.exhausted = value.is_none();
        value
    }
}

impl<T> FusedIterator for Drain<'_, T> {}

pub struct IntoIter<T> {
    queue: LockFreeQueue<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.queue.dequeue()
    }
}

impl<T> IntoIterator for LockFreeQueue<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { queue: self }
    }
}

impl<T> FromIterator<T> for LockFreeQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let queue = LockFreeQueue::new();
        for value in iter {
            queue.enqueue(value);
        }
        queue
    }
}
