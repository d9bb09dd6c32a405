//! AdjustQuantityHandler - Command handler for quantity steppers and
//! direct quantity entry.

use std::sync::Arc;

use crate::application::support::CartWriter;
use crate::application::{HandlerError, WriteLocks};
use crate::domain::cart::{Cart, QuantityOutcome};
use crate::domain::foundation::{CartId, CartItemId, CommandMetadata};
use crate::ports::{CartRepository, EventPublisher};

/// How the quantity changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuantityAdjustment {
    /// Sets an exact value (clamped to the allowed range).
    Set(f64),
    /// Steps up to the next whole unit.
    Increment,
    /// Steps down to the previous whole unit.
    Decrement,
}

#[derive(Debug, Clone)]
pub struct AdjustQuantityCommand {
    pub cart_id: CartId,
    pub cart_item_id: CartItemId,
    pub adjustment: QuantityAdjustment,
}

/// Result of a quantity change. `ConfirmationRequired` means nothing was
/// changed and the caller should ask before removing the line.
#[derive(Debug, Clone)]
pub struct AdjustQuantityResult {
    pub cart: Cart,
    pub outcome: QuantityOutcome,
}

pub struct AdjustQuantityHandler {
    writer: CartWriter,
}

impl AdjustQuantityHandler {
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
        cmd: AdjustQuantityCommand,
        metadata: CommandMetadata,
    ) -> Result<AdjustQuantityResult, HandlerError> {
        let id = cmd.cart_item_id;
        let (cart, outcome) = self
            .writer
            .modify(cmd.cart_id, &metadata, "change quantity", |cart| {
                match cmd.adjustment {
                    QuantityAdjustment::Set(quantity) => cart.set_quantity(id, quantity),
                    QuantityAdjustment::Increment => cart.increment_quantity(id),
                    QuantityAdjustment::Decrement => cart.decrement_quantity(id),
                }
            })
            .await?;

        if outcome == QuantityOutcome::ConfirmationRequired {
            tracing::debug!(cart_id = %cmd.cart_id, cart_item_id = %id, "Removal needs confirmation");
        }
        Ok(AdjustQuantityResult { cart, outcome })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;
    use crate::domain::foundation::Quantity;

    fn updated(from: f64, to: f64) -> QuantityOutcome {
        QuantityOutcome::Updated {
            from: Quantity::clamped(from),
            to: Quantity::clamped(to),
        }
    }

    fn command(cart_id: CartId, cart_item_id: CartItemId, adjustment: QuantityAdjustment) -> AdjustQuantityCommand {
        AdjustQuantityCommand {
            cart_id,
            cart_item_id,
            adjustment,
        }
    }

    #[tokio::test]
    async fn set_twice_publishes_once() {
        let fx = Fixture::new();
        let milk = fx.catalog_item("Milk", "StoreA", 2.5).await;
        let cart_id = fx.planning_cart("Weekly", 50.0).await;
        let line = fx.add_line(cart_id, milk, 1.0).await;
        fx.bus.clear();
        let handler = AdjustQuantityHandler::new(fx.carts(), fx.publisher(), fx.locks());

        let first = handler
            .handle(command(cart_id, line, QuantityAdjustment::Set(4.0)), CommandMetadata::test_fixture())
            .await
            .unwrap();
        let second = handler
            .handle(command(cart_id, line, QuantityAdjustment::Set(4.0)), CommandMetadata::test_fixture())
            .await
            .unwrap();

        assert_eq!(first.outcome, updated(1.0, 4.0));
        assert_eq!(second.outcome, QuantityOutcome::Unchanged);
        assert_eq!(fx.bus.event_count(), 1);
    }

    #[tokio::test]
    async fn zero_during_shopping_skips_planned_line() {
        let fx = Fixture::new();
        let milk = fx.catalog_item("Milk", "StoreA", 2.5).await;
        let cart_id = fx.planning_cart("Weekly", 50.0).await;
        let line = fx.add_line(cart_id, milk, 2.0).await;
        fx.begin(cart_id).await;

        let result = AdjustQuantityHandler::new(fx.carts(), fx.publisher(), fx.locks())
            .handle(command(cart_id, line, QuantityAdjustment::Set(0.0)), CommandMetadata::test_fixture())
            .await
            .unwrap();

        assert_eq!(result.outcome, QuantityOutcome::Skipped);
        let stored = fx.stored_cart(cart_id).await;
        let line = stored.find_item(line).unwrap();
        assert!(line.is_skipped());
        assert!(line.quantity().is_zero());
    }

    #[tokio::test]
    async fn stepping_moves_in_whole_units() {
        let fx = Fixture::new();
        let milk = fx.catalog_item("Milk", "StoreA", 2.5).await;
        let cart_id = fx.planning_cart("Weekly", 50.0).await;
        let line = fx.add_line(cart_id, milk, 1.5).await;
        let handler = AdjustQuantityHandler::new(fx.carts(), fx.publisher(), fx.locks());

        let up = handler
            .handle(command(cart_id, line, QuantityAdjustment::Increment), CommandMetadata::test_fixture())
            .await
            .unwrap();
        assert_eq!(up.outcome, updated(1.5, 3.0));

        let down = handler
            .handle(command(cart_id, line, QuantityAdjustment::Decrement), CommandMetadata::test_fixture())
            .await
            .unwrap();
        assert_eq!(down.outcome, updated(3.0, 2.0));
    }

    #[tokio::test]
    async fn zero_on_shopping_only_line_asks_for_confirmation() {
        let fx = Fixture::new();
        let cart_id = fx.shopping_cart("Weekly", 50.0).await;
        let snacks = fx
            .mutate(cart_id, |cart| {
                cart.add_ad_hoc_item("Snacks", "StoreA", 20.0, "bag", 1.0, None)
            })
            .await;
        fx.bus.clear();

        let result = AdjustQuantityHandler::new(fx.carts(), fx.publisher(), fx.locks())
            .handle(command(cart_id, snacks, QuantityAdjustment::Set(0.0)), CommandMetadata::test_fixture())
            .await
            .unwrap();

        assert_eq!(result.outcome, QuantityOutcome::ConfirmationRequired);
        assert_eq!(fx.stored_cart(cart_id).await.item_count(), 1);
        assert_eq!(fx.bus.event_count(), 0);
    }
}
