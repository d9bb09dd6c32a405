//! Price handlers: attaching a store to an item and repricing it there.

use std::sync::Arc;

use crate::application::support::VaultWriter;
use crate::application::{HandlerError, WriteLocks};
use crate::domain::foundation::{CommandMetadata, ItemId};
use crate::ports::{EventPublisher, VaultRepository};

/// Command to start selling an existing item at another store.
#[derive(Debug, Clone)]
pub struct AddPriceOptionCommand {
    pub item_id: ItemId,
    pub store: String,
    pub price: f64,
    pub unit: String,
}

pub struct AddPriceOptionHandler {
    writer: VaultWriter,
}

impl AddPriceOptionHandler {
    pub fn new(
        vault: Arc<dyn VaultRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        locks: Arc<WriteLocks>,
    ) -> Self {
        Self {
            writer: VaultWriter::new(vault, event_publisher, locks),
        }
    }

    pub async fn handle(
        &self,
        cmd: AddPriceOptionCommand,
        metadata: CommandMetadata,
    ) -> Result<(), HandlerError> {
        self.writer
            .modify(&metadata, "add price option", |vault| {
                vault.add_price_option(cmd.item_id, &cmd.store, cmd.price, &cmd.unit)
            })
            .await?;
        Ok(())
    }
}

/// Command to change an item's price at a store it is already sold at.
#[derive(Debug, Clone)]
pub struct UpdatePriceCommand {
    pub item_id: ItemId,
    pub store: String,
    pub price: f64,
}

pub struct UpdatePriceHandler {
    writer: VaultWriter,
}

impl UpdatePriceHandler {
    pub fn new(
        vault: Arc<dyn VaultRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        locks: Arc<WriteLocks>,
    ) -> Self {
        Self {
            writer: VaultWriter::new(vault, event_publisher, locks),
        }
    }

    /// Returns false when the price was already current.
    pub async fn handle(
        &self,
        cmd: UpdatePriceCommand,
        metadata: CommandMetadata,
    ) -> Result<bool, HandlerError> {
        let (_, changed) = self
            .writer
            .modify(&metadata, "update price", |vault| {
                vault.update_price(cmd.item_id, &cmd.store, cmd.price)
            })
            .await?;
        Ok(changed)
    }
}
