//! Cart summary read model.

use serde::{Deserialize, Serialize};

use crate::domain::cart::{Cart, CartStatus};
use crate::domain::catalog::Vault;
use crate::domain::foundation::CartId;

use super::{store_subtotals, BudgetDelta, Insights, PriceLedger, StoreSubtotal};

/// Everything the presentation layer shows about a cart at a glance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSummary {
    pub cart_id: CartId,
    pub name: String,
    pub status: CartStatus,
    pub budget: f64,
    pub item_count: usize,
    pub cart_value: f64,
    pub spent_so_far: f64,
    pub budget_delta: BudgetDelta,
    pub insights: Insights,
    pub stores: Vec<StoreSubtotal>,
}

impl CartSummary {
    pub fn build(cart: &Cart, vault: &Vault) -> Self {
        Self {
            cart_id: cart.id(),
            name: cart.name().to_string(),
            status: cart.status(),
            budget: cart.budget(),
            item_count: cart.item_count(),
            cart_value: PriceLedger::cart_value(cart, vault),
            spent_so_far: PriceLedger::spent_so_far(cart),
            budget_delta: PriceLedger::budget_delta(cart),
            insights: PriceLedger::insights(cart),
            stores: store_subtotals(cart, vault),
        }
    }
}
