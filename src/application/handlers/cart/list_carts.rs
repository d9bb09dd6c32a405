//! ListCartsHandler - Query handler for summaries of every cart.

use std::sync::Arc;

use crate::application::HandlerError;
use crate::domain::cart::CartStatus;
use crate::domain::ledger::CartSummary;
use crate::ports::{CartRepository, VaultRepository};

/// Lists carts, newest first, optionally only those in one phase.
#[derive(Debug, Clone, Default)]
pub struct ListCartsQuery {
    pub status: Option<CartStatus>,
}

pub struct ListCartsHandler {
    vault: Arc<dyn VaultRepository>,
    carts: Arc<dyn CartRepository>,
}

impl ListCartsHandler {
    pub fn new(vault: Arc<dyn VaultRepository>, carts: Arc<dyn CartRepository>) -> Self {
        Self { vault, carts }
    }

    pub async fn handle(&self, query: ListCartsQuery) -> Result<Vec<CartSummary>, HandlerError> {
        let vault = self.vault.load().await?;
        let summaries: Vec<CartSummary> = self
            .carts
            .find_all()
            .await?
            .iter()
            .filter(|cart| query.status.map_or(true, |status| cart.status() == status))
            .map(|cart| CartSummary::build(cart, &vault))
            .collect();

        tracing::debug!(count = summaries.len(), "Listed carts");
        Ok(summaries)
    }
}
