//! Price primitives shared by the catalog, carts and the ledger.
//!
//! Amounts are raw `f64` values in the user's single currency; formatting
//! for display belongs to the presentation layer.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::{require_positive, require_text};
use super::ValidationError;

/// Two prices (or quantities) closer than this are considered equal.
pub const CHANGE_TOLERANCE: f64 = 0.005;

/// Spend within this distance of the budget counts as on-budget.
pub const BUDGET_TOLERANCE: f64 = 0.01;

/// A price for one unit of something, e.g. 2.50 per "L".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitPrice {
    value: f64,
    unit: String,
}

impl UnitPrice {
    /// Creates a unit price; value must be > 0 and unit non-empty.
    pub fn new(value: f64, unit: impl AsRef<str>) -> Result<Self, ValidationError> {
        Ok(Self {
            value: require_positive("price", value)?,
            unit: require_text("unit", unit.as_ref())?,
        })
    }

    /// Returns the amount per unit.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the unit label.
    pub fn unit(&self) -> &str {
        &self.unit
    }
}

impl fmt::Display for UnitPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.value, self.unit)
    }
}

/// True when two optional amounts are both present and differ beyond tolerance.
pub fn differs(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => (a - b).abs() > CHANGE_TOLERANCE,
        _ => false,
    }
}
