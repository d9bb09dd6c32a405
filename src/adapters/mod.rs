//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - In-process event bus and a tracing subscriber
//! - `storage` - Vault and cart repositories (YAML files, in-memory)

pub mod events;
pub mod storage;

pub use events::{InMemoryEventBus, TracingEventHandler, ALL_EVENTS};
pub use storage::{
    FileCartRepository, FileVaultRepository, InMemoryCartRepository, InMemoryVaultRepository,
};
