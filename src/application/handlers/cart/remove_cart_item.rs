//! RemoveCartItemHandler - Command handler for the confirmed removal of a
//! cart line.

use std::sync::Arc;

use crate::application::support::CartWriter;
use crate::application::{HandlerError, WriteLocks};
use crate::domain::cart::Cart;
use crate::domain::foundation::{CartId, CartItemId, CommandMetadata};
use crate::ports::{CartRepository, EventPublisher};

#[derive(Debug, Clone)]
pub struct RemoveCartItemCommand {
    pub cart_id: CartId,
    pub cart_item_id: CartItemId,
}

pub struct RemoveCartItemHandler {
    writer: CartWriter,
}

impl RemoveCartItemHandler {
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
        cmd: RemoveCartItemCommand,
        metadata: CommandMetadata,
    ) -> Result<Cart, HandlerError> {
        let (cart, ()) = self
            .writer
            .modify(cmd.cart_id, &metadata, "remove item", |cart| {
                cart.remove_item(cmd.cart_item_id)
            })
            .await?;
        Ok(cart)
    }
}
