//! AddAdHocItemHandler - Command handler for buying something that is not
//! in the vault.

use std::sync::Arc;

use crate::application::support::CartWriter;
use crate::application::{HandlerError, WriteLocks};
use crate::domain::cart::Cart;
use crate::domain::foundation::{CartId, CartItemId, CommandMetadata};
use crate::ports::{CartRepository, EventPublisher};

/// Command to add a shopping-only line. Only valid while shopping.
#[derive(Debug, Clone)]
pub struct AddAdHocItemCommand {
    pub cart_id: CartId,
    pub name: String,
    pub store: String,
    pub price: f64,
    pub unit: String,
    pub quantity: f64,
    pub category: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AddAdHocItemResult {
    pub cart: Cart,
    pub cart_item_id: CartItemId,
}

pub struct AddAdHocItemHandler {
    writer: CartWriter,
}

impl AddAdHocItemHandler {
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
        cmd: AddAdHocItemCommand,
        metadata: CommandMetadata,
    ) -> Result<AddAdHocItemResult, HandlerError> {
        let AddAdHocItemCommand {
            cart_id,
            name,
            store,
            price,
            unit,
            quantity,
            category,
        } = cmd;

        let (cart, cart_item_id) = self
            .writer
            .modify(cart_id, &metadata, "add shopping-only item", |cart| {
                cart.add_ad_hoc_item(&name, &store, price, &unit, quantity, category)
            })
            .await?;
        Ok(AddAdHocItemResult { cart, cart_item_id })
    }
}
