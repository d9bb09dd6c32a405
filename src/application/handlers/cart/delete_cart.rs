//! DeleteCartHandler - Command handler for removing a cart.

use std::sync::Arc;

use crate::application::support::{cart_envelopes, load_cart, publish_envelopes};
use crate::application::{HandlerError, WriteLocks};
use crate::domain::foundation::{CartId, CommandMetadata};
use crate::ports::{CartRepository, EventPublisher};

#[derive(Debug, Clone)]
pub struct DeleteCartCommand {
    pub cart_id: CartId,
}

/// Handler for deleting carts. Allowed in every phase.
pub struct DeleteCartHandler {
    carts: Arc<dyn CartRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    locks: Arc<WriteLocks>,
}

impl DeleteCartHandler {
    pub fn new(
        carts: Arc<dyn CartRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        locks: Arc<WriteLocks>,
    ) -> Self {
        Self {
            carts,
            event_publisher,
            locks,
        }
    }

    pub async fn handle(
        &self,
        cmd: DeleteCartCommand,
        metadata: CommandMetadata,
    ) -> Result<(), HandlerError> {
        let guard = self.locks.lock_cart(cmd.cart_id).await;

        let cart = load_cart(self.carts.as_ref(), cmd.cart_id).await?;
        let event = cart.delete();
        self.carts.delete(cmd.cart_id).await?;

        self.locks.forget_cart(cmd.cart_id);
        drop(guard);

        publish_envelopes(
            self.event_publisher.as_ref(),
            &metadata,
            cart_envelopes(&[event])?,
        )
        .await?;

        tracing::info!(cart_id = %cmd.cart_id, "Cart deleted");
        Ok(())
    }
}
