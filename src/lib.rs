//! Generic linked containers.
//!
//! - [`BoundedStack`]: a capacity-limited stack that evicts its oldest
//!   element instead of rejecting a push.
//! - [`LockFreeQueue`]: an unbounded Michael-Scott queue for any number of
//!   concurrent producers and consumers.
//! - [`Stack`] and [`Set`]: plain single-threaded containers.
//!
//! Logging goes through [`tracing`]; install a subscriber to see it.

pub mod containers;
pub mod sync;

pub use containers::{BoundedStack, CapacityError, Set, Stack};
pub use sync::LockFreeQueue;
