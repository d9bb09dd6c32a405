//! Storage Adapters
//!
//! Implementations of the `VaultRepository` and `CartRepository` ports.
//!
//! ## Available Adapters
//!
//! - **FileVaultRepository / FileCartRepository** - YAML files on disk
//! - **InMemoryVaultRepository / InMemoryCartRepository** - process memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileCartRepository, InMemoryCartRepository};
//!
//! // Production: file-based storage
//! let carts = FileCartRepository::new("./data");
//!
//! // Testing: in-memory storage
//! let carts = InMemoryCartRepository::new();
//! ```

mod file;
mod in_memory;

pub use file::{FileCartRepository, FileVaultRepository};
pub use in_memory::{InMemoryCartRepository, InMemoryVaultRepository};
