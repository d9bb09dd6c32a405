//! Vault repository port.
//!
//! The vault is a singleton aggregate: there is exactly one catalog, so the
//! port loads and saves it whole.

use async_trait::async_trait;

use crate::domain::catalog::Vault;
use crate::domain::foundation::DomainError;

/// Repository port for the catalog.
///
/// Implementations must round-trip the vault losslessly, soft-deleted
/// items included.
#[async_trait]
pub trait VaultRepository: Send + Sync {
    /// Load the vault.
    ///
    /// Returns an empty vault if nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// - `StorageError` on read or decode failure
    async fn load(&self) -> Result<Vault, DomainError>;

    /// Replace the stored vault.
    ///
    /// # Errors
    ///
    /// - `StorageError` on encode or write failure
    async fn save(&self, vault: &Vault) -> Result<(), DomainError>;
}
