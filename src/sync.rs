//! Containers safe for unsynchronized use from many threads.

mod lock_free_queue;

pub use lock_free_queue::{Drain, IntoIter, LockFreeQueue};
