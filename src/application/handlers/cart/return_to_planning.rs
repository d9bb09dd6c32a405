//! ReturnToPlanningHandler - Command handler for abandoning a trip in
//! progress and going back to the plan.

use std::sync::Arc;

use crate::application::support::CartWriter;
use crate::application::{HandlerError, WriteLocks};
use crate::domain::cart::Cart;
use crate::domain::foundation::{CartId, CommandMetadata};
use crate::ports::{CartRepository, EventPublisher};

#[derive(Debug, Clone)]
pub struct ReturnToPlanningCommand {
    pub cart_id: CartId,
}

pub struct ReturnToPlanningHandler {
    writer: CartWriter,
}

impl ReturnToPlanningHandler {
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
        cmd: ReturnToPlanningCommand,
        metadata: CommandMetadata,
    ) -> Result<Cart, HandlerError> {
        let (cart, ()) = self
            .writer
            .modify(cmd.cart_id, &metadata, "return to planning", Cart::return_to_planning)
            .await?;
        Ok(cart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;
    use crate::domain::cart::{CartStatus, Fulfillment};

    #[tokio::test]
    async fn discards_trip_progress() {
        let fx = Fixture::new();
        let milk = fx.catalog_item("Milk", "StoreA", 2.5).await;
        let cart_id = fx.planning_cart("Weekly", 50.0).await;
        let line = fx.add_line(cart_id, milk, 2.0).await;
        fx.begin(cart_id).await;
        fx.mutate(cart_id, |cart| {
            cart.fulfill(line, Fulfillment::new(3.0, 2.0)).map(|_| ())
        })
        .await;

        let cart = ReturnToPlanningHandler::new(fx.carts(), fx.publisher(), fx.locks())
            .handle(ReturnToPlanningCommand { cart_id }, CommandMetadata::test_fixture())
            .await
            .unwrap();

        assert_eq!(cart.status(), CartStatus::Planning);
        assert!(!cart.find_item(line).unwrap().is_fulfilled());
        assert!(cart.started_at().is_none());
    }
}
