//! GetCartSummaryHandler - Query handler for a cart's totals, budget and
//! per-store breakdown.

use std::sync::Arc;

use crate::application::support::load_cart;
use crate::application::HandlerError;
use crate::domain::foundation::CartId;
use crate::domain::ledger::CartSummary;
use crate::ports::{CartRepository, VaultRepository};

#[derive(Debug, Clone)]
pub struct GetCartSummaryQuery {
    pub cart_id: CartId,
}

pub struct GetCartSummaryHandler {
    vault: Arc<dyn VaultRepository>,
    carts: Arc<dyn CartRepository>,
}

impl GetCartSummaryHandler {
    pub fn new(vault: Arc<dyn VaultRepository>, carts: Arc<dyn CartRepository>) -> Self {
        Self { vault, carts }
    }

    pub async fn handle(&self, query: GetCartSummaryQuery) -> Result<CartSummary, HandlerError> {
        let cart = load_cart(self.carts.as_ref(), query.cart_id).await?;
        let vault = self.vault.load().await?;
        tracing::debug!(cart_id = %query.cart_id, "Building cart summary");
        Ok(CartSummary::build(&cart, &vault))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn values_plan_from_vault_prices() {
        let fx = Fixture::new();
        let milk = fx.catalog_item("Milk", "StoreA", 2.5).await;
        let cart_id = fx.planning_cart("Weekly", 10.0).await;
        fx.add_line(cart_id, milk, 2.0).await;

        let summary = GetCartSummaryHandler::new(fx.vault(), fx.carts())
            .handle(GetCartSummaryQuery { cart_id })
            .await
            .unwrap();

        assert_eq!(summary.item_count, 1);
        assert_eq!(summary.cart_value, 5.0);
        assert_eq!(summary.spent_so_far, 0.0);
        assert_eq!(summary.stores.len(), 1);
    }

    #[tokio::test]
    async fn missing_cart_is_not_found() {
        let fx = Fixture::new();
        let err = GetCartSummaryHandler::new(fx.vault(), fx.carts())
            .handle(GetCartSummaryQuery {
                cart_id: CartId::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::CartNotFound);
    }
}
