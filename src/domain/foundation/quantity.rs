//! Quantity value object (0-100, fractional allowed).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Amount of a cart line, always within `[0, 100]`.
///
/// Manual entry may be fractional (1.5 kg). Stepping converges back to
/// whole units: `increment` rounds up before adding one, `decrement`
/// rounds down before subtracting one.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Quantity(f64);

impl Quantity {
    /// Zero units.
    pub const ZERO: Self = Self(0.0);

    /// One unit.
    pub const ONE: Self = Self(1.0);

    /// Upper bound of any cart line.
    pub const MAX: f64 = 100.0;

    /// Creates a quantity, clamping to `[0, 100]`. NaN becomes zero.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, Self::MAX))
    }

    /// Creates a quantity, returning error if out of range.
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || !(0.0..=Self::MAX).contains(&value) {
            return Err(ValidationError::out_of_range("quantity", 0.0, Self::MAX, value));
        }
        Ok(Self(value))
    }

    /// Returns the raw value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// True when nothing is left on the line.
    pub fn is_zero(&self) -> bool {
        self.0 <= 0.0
    }

    /// Next whole unit up: `ceil(q) + 1`, capped at 100.
    pub fn increment(&self) -> Self {
        Self::clamped(self.0.ceil() + 1.0)
    }

    /// Next whole unit down: `floor(q) - 1`, floored at 0.
    pub fn decrement(&self) -> Self {
        Self::clamped(self.0.floor() - 1.0)
    }

    /// Adds another quantity, capped at 100.
    pub fn saturating_add(&self, other: Quantity) -> Self {
        Self::clamped(self.0 + other.0)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Self::clamped(value)
    }
}

impl From<Quantity> for f64 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
