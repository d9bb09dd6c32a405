//! CreateCartHandler - Command handler for starting a new shopping trip.

use std::sync::Arc;

use crate::application::support::{cart_envelopes, publish_envelopes};
use crate::application::HandlerError;
use crate::domain::cart::Cart;
use crate::domain::foundation::CommandMetadata;
use crate::ports::{CartRepository, EventPublisher};

/// Command to create a cart in the planning phase.
#[derive(Debug, Clone)]
pub struct CreateCartCommand {
    pub name: String,
    pub budget: f64,
}

/// Result of successful cart creation.
#[derive(Debug, Clone)]
pub struct CreateCartResult {
    pub cart: Cart,
}

/// Handler for creating carts.
pub struct CreateCartHandler {
    carts: Arc<dyn CartRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateCartHandler {
    pub fn new(carts: Arc<dyn CartRepository>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            carts,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCartCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateCartResult, HandlerError> {
        let mut cart = Cart::new(&cmd.name, cmd.budget).map_err(|err| {
            tracing::warn!(name = %cmd.name, error = %err, "Cart creation rejected");
            err
        })?;

        self.carts.save(&cart).await?;

        let events = cart.take_events();
        publish_envelopes(
            self.event_publisher.as_ref(),
            &metadata,
            cart_envelopes(&events)?,
        )
        .await?;

        tracing::info!(cart_id = %cart.id(), name = %cart.name(), budget = cart.budget(), "Cart created");
        Ok(CreateCartResult { cart })
    }
}
