//! RecordPurchaseHandler - Command handler for the in-store actions on a
//! line: buying it, undoing that, skipping it and bringing it back.

use std::sync::Arc;

use crate::application::support::CartWriter;
use crate::application::{HandlerError, WriteLocks};
use crate::domain::cart::{Cart, Fulfillment};
use crate::domain::foundation::{CartId, CartItemId, CommandMetadata};
use crate::ports::{CartRepository, EventPublisher};

/// What happened to the line in the store.
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseAction {
    Fulfill(Fulfillment),
    Unfulfill,
    Skip,
    Unskip,
}

impl PurchaseAction {
    fn name(&self) -> &'static str {
        match self {
            PurchaseAction::Fulfill(_) => "fulfill",
            PurchaseAction::Unfulfill => "unfulfill",
            PurchaseAction::Skip => "skip",
            PurchaseAction::Unskip => "unskip",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordPurchaseCommand {
    pub cart_id: CartId,
    pub cart_item_id: CartItemId,
    pub action: PurchaseAction,
}

#[derive(Debug, Clone)]
pub struct RecordPurchaseResult {
    pub cart: Cart,
    /// False when the line was already in the requested state.
    pub changed: bool,
}

pub struct RecordPurchaseHandler {
    writer: CartWriter,
}

impl RecordPurchaseHandler {
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
        cmd: RecordPurchaseCommand,
        metadata: CommandMetadata,
    ) -> Result<RecordPurchaseResult, HandlerError> {
        let id = cmd.cart_item_id;
        let operation = cmd.action.name();
        let (cart, changed) = self
            .writer
            .modify(cmd.cart_id, &metadata, operation, |cart| match cmd.action {
                PurchaseAction::Fulfill(fulfillment) => cart.fulfill(id, fulfillment),
                PurchaseAction::Unfulfill => cart.unfulfill(id),
                PurchaseAction::Skip => cart.skip(id),
                PurchaseAction::Unskip => cart.unskip(id),
            })
            .await?;
        Ok(RecordPurchaseResult { cart, changed })
    }
}
