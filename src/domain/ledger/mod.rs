//! Ledger Module - Pure totals and groupings over a cart.
//!
//! Nothing here is cached or stored. Every figure is recomputed from the
//! cart (and the vault, for catalog prices) when it is asked for.
//!
//! # Components
//!
//! - `PriceLedger` - unit prices, cart value, spend, budget delta, insights
//! - `group_by_store` / `group_by_category` / `store_subtotals` - groupings
//! - `CartSummary` - combined read model

mod grouping;
mod summary;
mod totals;

pub use grouping::{
    group_by_category, group_by_store, store_subtotals, CategoryGroup, StoreGroup, StoreOrder,
    StoreSubtotal, UNASSIGNED_STORE,
};
pub use summary::CartSummary;
pub use totals::{BudgetDelta, BudgetStatus, Insights, PriceLedger};
