//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (write) and query handlers (read) live side by side in
//! `handlers`, grouped by aggregate.

mod error;
pub mod handlers;
mod locks;
pub(crate) mod support;

pub use error::HandlerError;
pub use handlers::*;
pub use locks::WriteLocks;
