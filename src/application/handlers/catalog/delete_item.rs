//! DeleteItemHandler - Command handler for removing an item from the vault
//! and from every cart that references it.

use std::sync::Arc;

use crate::application::support::{
    cart_envelopes, catalog_envelopes, load_cart, publish_envelopes,
};
use crate::application::{HandlerError, WriteLocks};
use crate::domain::catalog::CatalogError;
use crate::domain::foundation::{CommandMetadata, ItemId};
use crate::ports::{CartRepository, EventPublisher, VaultRepository};

#[derive(Debug, Clone)]
pub struct DeleteItemCommand {
    pub item_id: ItemId,
}

/// Result of a deletion: how many cart lines were dropped with the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteItemResult {
    pub carts_touched: usize,
    pub lines_removed: usize,
}

/// Handler for soft-deleting catalog items. The item stays in the vault
/// (so history can still resolve its name) but every cart line pointing at
/// it is removed, whatever phase the cart is in.
pub struct DeleteItemHandler {
    vault: Arc<dyn VaultRepository>,
    carts: Arc<dyn CartRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    locks: Arc<WriteLocks>,
}

impl DeleteItemHandler {
    pub fn new(
        vault: Arc<dyn VaultRepository>,
        carts: Arc<dyn CartRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        locks: Arc<WriteLocks>,
    ) -> Self {
        Self {
            vault,
            carts,
            event_publisher,
            locks,
        }
    }

    pub async fn handle(
        &self,
        cmd: DeleteItemCommand,
        metadata: CommandMetadata,
    ) -> Result<DeleteItemResult, HandlerError> {
        let metadata = metadata.resolved();
        let _vault_guard = self.locks.lock_vault().await;

        let mut vault = self.vault.load().await?;
        vault.delete_item(cmd.item_id).map_err(|err: CatalogError| {
            tracing::warn!(item_id = %cmd.item_id, error = %err, "Item deletion rejected");
            err
        })?;
        let catalog_events = vault.take_events();
        if !catalog_events.is_empty() {
            self.vault.save(&vault).await?;
            publish_envelopes(
                self.event_publisher.as_ref(),
                &metadata,
                catalog_envelopes(&catalog_events)?,
            )
            .await?;
        }

        let mut result = DeleteItemResult {
            carts_touched: 0,
            lines_removed: 0,
        };
        for cart_id in self.carts.find_all().await?.iter().map(|c| c.id()) {
            let _cart_guard = self.locks.lock_cart(cart_id).await;
            let mut cart = match load_cart(self.carts.as_ref(), cart_id).await {
                Ok(cart) => cart,
                // Deleted since the listing.
                Err(HandlerError::CartNotFound(_)) => continue,
                Err(err) => return Err(err),
            };

            let removed = cart.purge_catalog_item(cmd.item_id);
            if removed == 0 {
                continue;
            }
            self.carts.save(&cart).await?;
            publish_envelopes(
                self.event_publisher.as_ref(),
                &metadata,
                cart_envelopes(&cart.take_events())?,
            )
            .await?;

            result.carts_touched += 1;
            result.lines_removed += removed;
        }

        tracing::info!(
            item_id = %cmd.item_id,
            carts = result.carts_touched,
            lines = result.lines_removed,
            "Item deleted from catalog"
        );
        Ok(result)
    }
}
