//! UpdateCartDetailsHandler - Command handler for renaming a cart or
//! changing its budget.

use std::sync::Arc;

use crate::application::support::CartWriter;
use crate::application::{HandlerError, WriteLocks};
use crate::domain::cart::Cart;
use crate::domain::foundation::{CartId, CommandMetadata};
use crate::ports::{CartRepository, EventPublisher};

/// Command to change a cart's name and/or budget. `None` leaves a field as is.
#[derive(Debug, Clone)]
pub struct UpdateCartDetailsCommand {
    pub cart_id: CartId,
    pub name: Option<String>,
    pub budget: Option<f64>,
}

/// Handler for cart detail changes.
pub struct UpdateCartDetailsHandler {
    writer: CartWriter,
}

impl UpdateCartDetailsHandler {
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
        cmd: UpdateCartDetailsCommand,
        metadata: CommandMetadata,
    ) -> Result<Cart, HandlerError> {
        let (cart, ()) = self
            .writer
            .modify(cmd.cart_id, &metadata, "update details", |cart| {
                if let Some(name) = &cmd.name {
                    cart.rename(name)?;
                }
                if let Some(budget) = cmd.budget {
                    cart.set_budget(budget)?;
                }
                Ok(())
            })
            .await?;
        Ok(cart)
    }
}
