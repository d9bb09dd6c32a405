//! AddCatalogItemHandler - Command handler for putting a vault item in a cart.

use std::sync::Arc;

use crate::application::support::CartWriter;
use crate::application::{HandlerError, WriteLocks};
use crate::domain::cart::Cart;
use crate::domain::catalog::CatalogError;
use crate::domain::foundation::{CartId, CartItemId, CommandMetadata, ItemId};
use crate::ports::{CartRepository, EventPublisher, VaultRepository};

/// Command to add a catalog item to a cart.
#[derive(Debug, Clone)]
pub struct AddCatalogItemCommand {
    pub cart_id: CartId,
    pub item_id: ItemId,
    pub quantity: f64,
    /// Store to plan the purchase at; defaults to the item's first price option.
    pub store: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AddCatalogItemResult {
    pub cart: Cart,
    pub cart_item_id: CartItemId,
}

/// Handler for adding vault items to carts. Holds the vault lock while the
/// line is written, so a concurrent item deletion cannot miss the new line.
pub struct AddCatalogItemHandler {
    vault: Arc<dyn VaultRepository>,
    writer: CartWriter,
    locks: Arc<WriteLocks>,
}

impl AddCatalogItemHandler {
    pub fn new(
        vault: Arc<dyn VaultRepository>,
        carts: Arc<dyn CartRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        locks: Arc<WriteLocks>,
    ) -> Self {
        Self {
            vault,
            writer: CartWriter::new(carts, event_publisher, Arc::clone(&locks)),
            locks,
        }
    }

    pub async fn handle(
        &self,
        cmd: AddCatalogItemCommand,
        metadata: CommandMetadata,
    ) -> Result<AddCatalogItemResult, HandlerError> {
        let _vault_guard = self.locks.lock_vault().await;
        let vault = self.vault.load().await?;
        let item = vault
            .find_item_including_deleted(cmd.item_id)
            .ok_or(CatalogError::ItemNotFound(cmd.item_id))?;

        let (cart, cart_item_id) = self
            .writer
            .modify(cmd.cart_id, &metadata, "add catalog item", |cart| {
                cart.add_catalog_item(item, cmd.quantity, cmd.store.as_deref())
            })
            .await?;

        tracing::debug!(cart_id = %cmd.cart_id, item_id = %cmd.item_id, cart_item_id = %cart_item_id, "Catalog item in cart");
        Ok(AddCatalogItemResult { cart, cart_item_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryVaultRepository;
    use crate::application::handlers::catalog::{DeleteItemCommand, DeleteItemHandler};
    use crate::application::handlers::test_support::Fixture;
    use crate::domain::catalog::Vault;
    use crate::domain::foundation::{DomainError, ErrorCode};
    use async_trait::async_trait;
    use std::time::Duration;

    fn command(cart_id: CartId, item_id: ItemId, quantity: f64) -> AddCatalogItemCommand {
        AddCatalogItemCommand {
            cart_id,
            item_id,
            quantity,
            store: None,
        }
    }

    #[tokio::test]
    async fn adds_line_and_grows_it_on_repeat() {
        let fx = Fixture::new();
        let milk = fx.catalog_item("Milk", "StoreA", 2.5).await;
        let cart_id = fx.planning_cart("Weekly", 50.0).await;
        let handler =
            AddCatalogItemHandler::new(fx.vault(), fx.carts(), fx.publisher(), fx.locks());

        let first = handler
            .handle(command(cart_id, milk, 1.0), CommandMetadata::test_fixture())
            .await
            .unwrap();
        let second = handler
            .handle(command(cart_id, milk, 2.0), CommandMetadata::test_fixture())
            .await
            .unwrap();

        assert_eq!(first.cart_item_id, second.cart_item_id);
        let stored = fx.stored_cart(cart_id).await;
        assert_eq!(stored.item_count(), 1);
        assert_eq!(stored.find_item(first.cart_item_id).unwrap().quantity().value(), 3.0);
        assert_eq!(fx.bus.events_of_type("cart.item_changed.v1").len(), 2);
    }

    #[tokio::test]
    async fn unknown_item_is_not_found() {
        let fx = Fixture::new();
        let cart_id = fx.planning_cart("Weekly", 50.0).await;
        let handler =
            AddCatalogItemHandler::new(fx.vault(), fx.carts(), fx.publisher(), fx.locks());

        let err = handler
            .handle(command(cart_id, ItemId::new(), 1.0), CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::ItemNotFound);
    }

    /// Vault storage that answers loads only after a delay.
    struct SlowVault {
        inner: Arc<InMemoryVaultRepository>,
        delay: Duration,
    }

    #[async_trait]
    impl VaultRepository for SlowVault {
        async fn load(&self) -> Result<Vault, DomainError> {
            tokio::time::sleep(self.delay).await;
            self.inner.load().await
        }

        async fn save(&self, vault: &Vault) -> Result<(), DomainError> {
            self.inner.save(vault).await
        }
    }

    #[tokio::test]
    async fn concurrent_item_deletion_still_removes_the_new_line() {
        let fx = Fixture::new();
        let milk = fx.catalog_item("Milk", "StoreA", 2.5).await;
        let cart_id = fx.planning_cart("Weekly", 50.0).await;
        let slow_vault: Arc<dyn VaultRepository> = Arc::new(SlowVault {
            inner: fx.vault_repo.clone(),
            delay: Duration::from_millis(100),
        });

        let add = {
            let handler = AddCatalogItemHandler::new(
                Arc::clone(&slow_vault),
                fx.carts(),
                fx.publisher(),
                fx.locks(),
            );
            tokio::spawn(async move {
                handler
                    .handle(command(cart_id, milk, 1.0), CommandMetadata::test_fixture())
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let deleted = DeleteItemHandler::new(slow_vault, fx.carts(), fx.publisher(), fx.locks())
            .handle(DeleteItemCommand { item_id: milk }, CommandMetadata::test_fixture())
            .await
            .unwrap();
        let added = add.await.unwrap();

        assert!(added.is_ok());
        assert_eq!(deleted.lines_removed, 1);
        assert!(fx.stored_cart(cart_id).await.line_for(milk).is_none());
        let vault = fx.vault_repo.load().await.unwrap();
        assert!(vault.find_item_including_deleted(milk).unwrap().is_deleted());
    }

    #[tokio::test]
    async fn deleted_item_cannot_be_added() {
        let fx = Fixture::new();
        let milk = fx.catalog_item("Milk", "StoreA", 2.5).await;
        let cart_id = fx.planning_cart("Weekly", 50.0).await;
        DeleteItemHandler::new(fx.vault(), fx.carts(), fx.publisher(), fx.locks())
            .handle(DeleteItemCommand { item_id: milk }, CommandMetadata::test_fixture())
            .await
            .unwrap();

        let err = AddCatalogItemHandler::new(fx.vault(), fx.carts(), fx.publisher(), fx.locks())
            .handle(command(cart_id, milk, 1.0), CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::ItemDeleted);
        assert_eq!(fx.stored_cart(cart_id).await.item_count(), 0);
    }

    #[tokio::test]
    async fn non_positive_quantity_is_rejected() {
        let fx = Fixture::new();
        let milk = fx.catalog_item("Milk", "StoreA", 2.5).await;
        let cart_id = fx.planning_cart("Weekly", 50.0).await;
        let handler =
            AddCatalogItemHandler::new(fx.vault(), fx.carts(), fx.publisher(), fx.locks());

        let err = handler
            .handle(command(cart_id, milk, 0.0), CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(fx.stored_cart(cart_id).await.item_count(), 0);
    }
}
