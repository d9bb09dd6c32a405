//! AddCategoryHandler - Command handler for creating a vault category.

use std::sync::Arc;

use crate::application::support::VaultWriter;
use crate::application::{HandlerError, WriteLocks};
use crate::domain::foundation::{CategoryId, CommandMetadata};
use crate::ports::{EventPublisher, VaultRepository};

#[derive(Debug, Clone)]
pub struct AddCategoryCommand {
    pub name: String,
    /// Position in category listings; appended last when absent.
    pub sort_order: Option<i32>,
    pub color: Option<String>,
}

pub struct AddCategoryHandler {
    writer: VaultWriter,
}

impl AddCategoryHandler {
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
        cmd: AddCategoryCommand,
        metadata: CommandMetadata,
    ) -> Result<CategoryId, HandlerError> {
        let (_, category_id) = self
            .writer
            .modify(&metadata, "add category", |vault| {
                vault.add_category(&cmd.name, cmd.sort_order, cmd.color)
            })
            .await?;
        Ok(category_id)
    }
}
