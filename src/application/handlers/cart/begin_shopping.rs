//! BeginShoppingHandler - Command handler for moving a cart from planning
//! to shopping.

use std::sync::Arc;

use crate::application::support::CartWriter;
use crate::application::{HandlerError, WriteLocks};
use crate::domain::cart::Cart;
use crate::domain::foundation::{CartId, CommandMetadata};
use crate::ports::{CartRepository, EventPublisher, VaultRepository};

/// Command to start the trip.
#[derive(Debug, Clone)]
pub struct BeginShoppingCommand {
    pub cart_id: CartId,
}

/// Handler for starting a trip. Planned prices are resolved against the
/// vault as it is when the trip starts; the vault lock is held until the
/// snapshot is saved.
pub struct BeginShoppingHandler {
    vault: Arc<dyn VaultRepository>,
    writer: CartWriter,
    locks: Arc<WriteLocks>,
}

impl BeginShoppingHandler {
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
        cmd: BeginShoppingCommand,
        metadata: CommandMetadata,
    ) -> Result<Cart, HandlerError> {
        let _vault_guard = self.locks.lock_vault().await;
        let vault = self.vault.load().await?;
        let (cart, ()) = self
            .writer
            .modify(cmd.cart_id, &metadata, "begin shopping", |cart| {
                cart.begin_shopping(&vault)
            })
            .await?;
        Ok(cart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;
    use crate::domain::cart::CartStatus;
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn starts_trip_and_resolves_planned_prices() {
        let fx = Fixture::new();
        let milk = fx.catalog_item("Milk", "StoreA", 2.5).await;
        let cart_id = fx.planning_cart("Weekly", 50.0).await;
        let line = fx.add_line(cart_id, milk, 2.0).await;
        let handler =
            BeginShoppingHandler::new(fx.vault(), fx.carts(), fx.publisher(), fx.locks());

        let cart = handler
            .handle(BeginShoppingCommand { cart_id }, CommandMetadata::test_fixture())
            .await
            .unwrap();

        assert_eq!(cart.status(), CartStatus::Shopping);
        assert_eq!(cart.find_item(line).unwrap().planned_price(), Some(2.5));
        assert!(fx.bus.has_event("cart.phase_changed.v1"));
    }

    #[tokio::test]
    async fn second_start_is_a_state_error() {
        let fx = Fixture::new();
        let cart_id = fx.shopping_cart("Weekly", 50.0).await;
        let handler =
            BeginShoppingHandler::new(fx.vault(), fx.carts(), fx.publisher(), fx.locks());

        let err = handler
            .handle(BeginShoppingCommand { cart_id }, CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::InvalidCartPhase);
    }
}
