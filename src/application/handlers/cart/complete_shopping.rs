//! CompleteShoppingHandler - Command handler for finishing a trip and
//! merging selected shopping-only items into the vault.

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::support::{
    cart_envelopes, catalog_envelopes, load_cart, publish_envelopes,
};
use crate::application::{HandlerError, WriteLocks};
use crate::domain::cart::{Cart, CompletionReport};
use crate::domain::foundation::{CartId, CartItemId, CommandMetadata};
use crate::ports::{CartRepository, EventPublisher, VaultRepository};

/// Command to complete a trip.
#[derive(Debug, Clone)]
pub struct CompleteShoppingCommand {
    pub cart_id: CartId,
    /// Shopping-only lines mapped to `true` are promoted into the vault.
    pub merge_selections: HashMap<CartItemId, bool>,
    /// Category for merged items that have none. Falls back to the
    /// configured default category.
    pub category_fallback: Option<String>,
}

/// Result of a completed trip.
#[derive(Debug, Clone)]
pub struct CompleteShoppingResult {
    pub cart: Cart,
    pub report: CompletionReport,
}

/// Handler for completing trips.
pub struct CompleteShoppingHandler {
    vault: Arc<dyn VaultRepository>,
    carts: Arc<dyn CartRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    locks: Arc<WriteLocks>,
    default_category: String,
}

impl CompleteShoppingHandler {
    pub fn new(
        vault: Arc<dyn VaultRepository>,
        carts: Arc<dyn CartRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        locks: Arc<WriteLocks>,
        default_category: impl Into<String>,
    ) -> Self {
        Self {
            vault,
            carts,
            event_publisher,
            locks,
            default_category: default_category.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: CompleteShoppingCommand,
        metadata: CommandMetadata,
    ) -> Result<CompleteShoppingResult, HandlerError> {
        let _vault_guard = self.locks.lock_vault().await;
        let _cart_guard = self.locks.lock_cart(cmd.cart_id).await;

        let mut vault = self.vault.load().await?;
        let mut cart = load_cart(self.carts.as_ref(), cmd.cart_id).await?;

        let fallback = cmd
            .category_fallback
            .as_deref()
            .unwrap_or(&self.default_category);
        let report = cart
            .complete_shopping(&mut vault, &cmd.merge_selections, fallback)
            .map_err(|err| {
                tracing::warn!(cart_id = %cmd.cart_id, error = %err, "Trip completion rejected");
                err
            })?;

        let catalog_events = vault.take_events();
        if !catalog_events.is_empty() {
            self.vault.save(&vault).await?;
        }
        let cart_events = cart.take_events();
        self.carts.save(&cart).await?;

        let mut envelopes = catalog_envelopes(&catalog_events)?;
        envelopes.extend(cart_envelopes(&cart_events)?);
        publish_envelopes(self.event_publisher.as_ref(), &metadata, envelopes).await?;

        tracing::info!(
            cart_id = %cmd.cart_id,
            merged = report.merged.len(),
            "Trip completed"
        );
        Ok(CompleteShoppingResult { cart, report })
    }
}
