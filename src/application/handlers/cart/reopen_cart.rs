//! ReopenCartHandler - Command handler for taking a completed cart back to
//! shopping.

use std::sync::Arc;

use crate::application::support::CartWriter;
use crate::application::{HandlerError, WriteLocks};
use crate::domain::cart::Cart;
use crate::domain::foundation::{CartId, CommandMetadata};
use crate::ports::{CartRepository, EventPublisher};

#[derive(Debug, Clone)]
pub struct ReopenCartCommand {
    pub cart_id: CartId,
}

/// Handler for reopening completed carts. Items already merged into the
/// vault stay there.
pub struct ReopenCartHandler {
    writer: CartWriter,
}

impl ReopenCartHandler {
    pub fn new(
        carts: Arc<dyn CartRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        locks: Arc<WriteLocks>,
    ) -> Self {
        Self {
            writer: CartWriter::new(carts, event_publisher, locks),
        }
    }

    pub async fn handle(
        &self,
        cmd: ReopenCartCommand,
        metadata: CommandMetadata,
    ) -> Result<Cart, HandlerError> {
        let (cart, ()) = self
            .writer
            .modify(cmd.cart_id, &metadata, "reopen", Cart::reopen)
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
    use crate::ports::VaultRepository;
    use std::collections::HashMap;

    #[tokio::test]
    async fn reopens_completed_cart() {
        let fx = Fixture::new();
        let cart_id = fx.shopping_cart("Weekly", 50.0).await;
        let mut vault = fx.vault_repo.load().await.unwrap();
        fx.mutate(cart_id, |cart| {
            cart.complete_shopping(&mut vault, &HashMap::new(), "Misc")
                .map(|_| ())
        })
        .await;

        let cart = ReopenCartHandler::new(fx.carts(), fx.publisher(), fx.locks())
            .handle(ReopenCartCommand { cart_id }, CommandMetadata::test_fixture())
            .await
            .unwrap();

        assert_eq!(cart.status(), CartStatus::Shopping);
        assert!(cart.completed_at().is_none());
    }

    #[tokio::test]
    async fn planning_cart_cannot_be_reopened() {
        let fx = Fixture::new();
        let cart_id = fx.planning_cart("Weekly", 50.0).await;

        let err = ReopenCartHandler::new(fx.carts(), fx.publisher(), fx.locks())
            .handle(ReopenCartCommand { cart_id }, CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert!(err.code().is_state_error());
    }

    #[tokio::test]
    async fn missing_cart_is_not_found() {
        let fx = Fixture::new();
        let err = ReopenCartHandler::new(fx.carts(), fx.publisher(), fx.locks())
            .handle(
                ReopenCartCommand {
                    cart_id: CartId::new(),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::CartNotFound);
    }
}
