//! Command and query handlers.
//!
//! Each command handler follows the same shape: take the aggregate's write
//! lock, load it, apply one domain operation, save it and publish the
//! events it recorded, stamped with the command's correlation ID.

pub mod cart;
pub mod catalog;

#[cfg(test)]
pub(crate) mod test_support;

pub use cart::*;
pub use catalog::*;
