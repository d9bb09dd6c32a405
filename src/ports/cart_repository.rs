//! Cart repository port.
//!
//! Defines the contract for persisting and retrieving Cart aggregates.

use async_trait::async_trait;

use crate::domain::cart::Cart;
use crate::domain::foundation::{CartId, DomainError};

/// Repository port for Cart aggregate persistence.
///
/// `save` is an upsert. Implementations must round-trip a cart losslessly;
/// pending domain events are not persisted.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Insert or replace a cart.
    ///
    /// # Errors
    ///
    /// - `StorageError` on persistence failure
    async fn save(&self, cart: &Cart) -> Result<(), DomainError>;

    /// Find a cart by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: CartId) -> Result<Option<Cart>, DomainError>;

    /// All carts, most recently created first.
    async fn find_all(&self) -> Result<Vec<Cart>, DomainError>;

    /// Check if a cart exists.
    async fn exists(&self, id: CartId) -> Result<bool, DomainError>;

    /// Remove a cart.
    ///
    /// # Errors
    ///
    /// - `CartNotFound` if the cart doesn't exist
    /// - `StorageError` on persistence failure
    async fn delete(&self, id: CartId) -> Result<(), DomainError>;
}
