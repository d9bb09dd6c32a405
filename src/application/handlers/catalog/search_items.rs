//! SearchItemsHandler - Query handler for finding vault items by name.

use std::sync::Arc;

use crate::application::HandlerError;
use crate::domain::catalog::{Item, NameMatch};
use crate::ports::VaultRepository;

#[derive(Debug, Clone)]
pub struct SearchItemsQuery {
    pub name: String,
    pub mode: NameMatch,
}

/// One search hit with the name of the category it is filed under.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemMatch {
    pub item: Item,
    pub category: String,
}

pub struct SearchItemsHandler {
    vault: Arc<dyn VaultRepository>,
}

impl SearchItemsHandler {
    pub fn new(vault: Arc<dyn VaultRepository>) -> Self {
        Self { vault }
    }

    /// Active items only, in category order.
    pub async fn handle(&self, query: SearchItemsQuery) -> Result<Vec<ItemMatch>, HandlerError> {
        let vault = self.vault.load().await?;
        let matches: Vec<ItemMatch> = vault
            .find_items_by_name(&query.name, query.mode)
            .into_iter()
            .map(|item| ItemMatch {
                category: vault.category_name_of(item.id()).unwrap_or_default().to_string(),
                item: item.clone(),
            })
            .collect();

        tracing::debug!(query = %query.name, hits = matches.len(), "Catalog search");
        Ok(matches)
    }
}
