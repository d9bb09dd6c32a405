//! AddItemHandler - Command handler for adding an item to the vault.

use std::sync::Arc;

use crate::application::support::VaultWriter;
use crate::application::{HandlerError, WriteLocks};
use crate::domain::foundation::{CommandMetadata, ItemId};
use crate::ports::{EventPublisher, VaultRepository};

/// Command to add `name` at `store` to the vault.
#[derive(Debug, Clone)]
pub struct AddItemCommand {
    pub name: String,
    pub category: String,
    pub store: String,
    pub price: f64,
    pub unit: String,
}

/// Handler for manual catalog entry. A duplicate (name, store) pair comes
/// back as a validation failure.
pub struct AddItemHandler {
    writer: VaultWriter,
}

impl AddItemHandler {
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
        cmd: AddItemCommand,
        metadata: CommandMetadata,
    ) -> Result<ItemId, HandlerError> {
        let (_, item_id) = self
            .writer
            .modify(&metadata, "add item", |vault| {
                vault.add_item(&cmd.name, &cmd.category, &cmd.store, cmd.price, &cmd.unit)
            })
            .await?;
        tracing::debug!(item_id = %item_id, name = %cmd.name, store = %cmd.store, "Item in catalog");
        Ok(item_id)
    }
}
