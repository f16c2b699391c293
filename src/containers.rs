//! Single-threaded linked containers.

mod bounded_stack;
mod chain;
mod set;
mod stack;

pub use bounded_stack::{BoundedStack, CapacityError};
pub use chain::Iter;
pub use set::Set;
pub use stack::Stack;
