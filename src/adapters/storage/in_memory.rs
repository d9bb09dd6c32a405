//! In-memory repositories.
//!
//! Keep aggregates in process memory. Used by tests and by the `memory`
//! storage backend, where nothing outlives the process.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::cart::Cart;
use crate::domain::catalog::Vault;
use crate::domain::foundation::{CartId, DomainError, ErrorCode};
use crate::ports::{CartRepository, VaultRepository};

/// In-memory storage for the vault.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVaultRepository {
    vault: Arc<RwLock<Vault>>,
}

impl InMemoryVaultRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with an existing vault (useful for tests).
    pub fn with_vault(vault: Vault) -> Self {
        Self {
            vault: Arc::new(RwLock::new(vault)),
        }
    }
}

#[async_trait]
impl VaultRepository for InMemoryVaultRepository {
    async fn load(&self) -> Result<Vault, DomainError> {
        Ok(self.vault.read().await.clone())
    }

    async fn save(&self, vault: &Vault) -> Result<(), DomainError> {
        let mut stored = vault.clone();
        stored.take_events();
        *self.vault.write().await = stored;
        Ok(())
    }
}

/// In-memory storage for carts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartRepository {
    carts: Arc<RwLock<HashMap<CartId, Cart>>>,
}

impl InMemoryCartRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored carts.
    pub async fn count(&self) -> usize {
        self.carts.read().await.len()
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn save(&self, cart: &Cart) -> Result<(), DomainError> {
        let mut stored = cart.clone();
        stored.take_events();
        self.carts.write().await.insert(cart.id(), stored);
        Ok(())
    }

    async fn find_by_id(&self, id: CartId) -> Result<Option<Cart>, DomainError> {
        Ok(self.carts.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Cart>, DomainError> {
        let mut carts: Vec<Cart> = self.carts.read().await.values().cloned().collect();
        carts.sort_by_key(|c| std::cmp::Reverse(c.created_at()));
        Ok(carts)
    }

    async fn exists(&self, id: CartId) -> Result<bool, DomainError> {
        Ok(self.carts.read().await.contains_key(&id))
    }

    async fn delete(&self, id: CartId) -> Result<(), DomainError> {
        match self.carts.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DomainError::new(
                ErrorCode::CartNotFound,
                format!("Cart not found: {}", id),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_repository_loads_empty_vault() {
        let repo = InMemoryVaultRepository::new();
        assert_eq!(repo.load().await.unwrap().item_count(), 0);
    }

    #[tokio::test]
    async fn saved_vault_is_returned_without_pending_events() {
        let repo = InMemoryVaultRepository::new();
        let mut vault = Vault::new();
        vault.add_item("Milk", "Dairy", "StoreA", 2.5, "L").unwrap();

        repo.save(&vault).await.unwrap();
        let mut loaded = repo.load().await.unwrap();

        assert_eq!(loaded.item_count(), 1);
        assert!(loaded.take_events().is_empty());
    }

    #[tokio::test]
    async fn cart_save_find_delete() {
        let repo = InMemoryCartRepository::new();
        let cart = Cart::new("Weekly", 100.0).unwrap();
        let id = cart.id();

        repo.save(&cart).await.unwrap();
        assert!(repo.exists(id).await.unwrap());
        assert_eq!(repo.find_by_id(id).await.unwrap().unwrap().name(), "Weekly");

        repo.delete(id).await.unwrap();
        assert!(repo.find_by_id(id).await.unwrap().is_none());
        assert_eq!(
            repo.delete(id).await.unwrap_err().code,
            ErrorCode::CartNotFound
        );
    }

    #[tokio::test]
    async fn find_all_lists_newest_first() {
        let repo = InMemoryCartRepository::new();
        let older = Cart::new("Older", 10.0).unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let newer = Cart::new("Newer", 10.0).unwrap();
        repo.save(&older).await.unwrap();
        repo.save(&newer).await.unwrap();

        let names: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec!["Newer", "Older"]);
        assert_eq!(repo.count().await, 2);
    }
}
