//! Price Ledger - running totals and budget tracking for a cart.

use serde::{Deserialize, Serialize};

use crate::domain::cart::{Cart, CartItem, CartItemSource};
use crate::domain::catalog::Vault;
use crate::domain::foundation::BUDGET_TOLERANCE;

/// Where spending stands against the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    Over,
    Under,
    OnBudget,
}

/// Spend minus budget, classified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetDelta {
    /// Positive when over budget.
    pub amount: f64,
    pub status: BudgetStatus,
}

impl BudgetDelta {
    /// Classifies `amount` with a one-cent tolerance either way.
    pub fn from_amount(amount: f64) -> Self {
        let status = if amount > BUDGET_TOLERANCE {
            BudgetStatus::Over
        } else if amount < -BUDGET_TOLERANCE {
            BudgetStatus::Under
        } else {
            BudgetStatus::OnBudget
        };
        Self { amount, status }
    }

    /// Budget left to spend, never negative.
    pub fn remaining(&self) -> f64 {
        (-self.amount).max(0.0)
    }
}

/// Trip statistics for the completion screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub fulfilled: usize,
    pub skipped: usize,
    pub added_during_shopping: usize,
    pub changed_from_plan: usize,
}

/// Calculator for cart totals.
///
/// All functions are pure and recompute from the cart on every call.
pub struct PriceLedger;

impl PriceLedger {
    /// Best known price for one unit of a line:
    /// actual, then planned, then the current source price, else 0.
    pub fn unit_price(line: &CartItem, vault: &Vault) -> f64 {
        line.actual_price()
            .or(line.planned_price())
            .or_else(|| Self::source_price(line, vault))
            .unwrap_or(0.0)
    }

    fn source_price(line: &CartItem, vault: &Vault) -> Option<f64> {
        match line.source() {
            CartItemSource::AdHoc(payload) => Some(payload.price()),
            CartItemSource::Catalog { item_id } => vault
                .find_item_including_deleted(*item_id)
                .and_then(|item| item.current_price(line.planned_store()))
                .map(|option| option.price()),
        }
    }

    /// Value of a single line at its current quantity.
    pub fn line_value(line: &CartItem, vault: &Vault) -> f64 {
        if line.quantity().is_zero() {
            return 0.0;
        }
        Self::unit_price(line, vault) * line.quantity().value()
    }

    /// Value of everything still on the list.
    pub fn cart_value(cart: &Cart, vault: &Vault) -> f64 {
        Self::items_value(cart.items(), vault)
    }

    /// Value of an arbitrary set of lines.
    pub fn items_value<'a>(lines: impl IntoIterator<Item = &'a CartItem>, vault: &Vault) -> f64 {
        lines.into_iter().map(|l| Self::line_value(l, vault)).sum()
    }

    /// Amount of a line that counts as spent. Zero unless fulfilled.
    pub fn line_spent(line: &CartItem) -> f64 {
        if !line.is_fulfilled() || line.is_skipped() {
            return 0.0;
        }
        let price = line.actual_price().or(line.planned_price()).unwrap_or(0.0);
        let quantity = line.actual_quantity().unwrap_or(line.quantity().value());
        price * quantity
    }

    /// Money spent so far on this trip.
    pub fn spent_so_far(cart: &Cart) -> f64 {
        Self::items_spent(cart.items())
    }

    pub fn items_spent<'a>(lines: impl IntoIterator<Item = &'a CartItem>) -> f64 {
        lines.into_iter().map(Self::line_spent).sum()
    }

    /// Spent so far against the cart's budget.
    pub fn budget_delta(cart: &Cart) -> BudgetDelta {
        BudgetDelta::from_amount(Self::spent_so_far(cart) - cart.budget())
    }

    /// Counts lines by how the trip went for them.
    pub fn insights(cart: &Cart) -> Insights {
        cart.items().iter().fold(Insights::default(), |mut acc, line| {
            if line.is_fulfilled() {
                acc.fulfilled += 1;
            }
            if line.is_skipped() {
                acc.skipped += 1;
            }
            if line.added_during_shopping() {
                acc.added_during_shopping += 1;
            }
            if line.changed_from_plan() {
                acc.changed_from_plan += 1;
            }
            acc
        })
    }
}
