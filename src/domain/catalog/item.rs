//! Catalog items and their per-store prices.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CategoryId, ItemId, Timestamp, UnitPrice};

/// Case-insensitive comparison used for every catalog key.
pub(crate) fn same_key(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// What one store charges for an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceOption {
    store: String,
    price_per_unit: UnitPrice,
}

impl PriceOption {
    pub fn new(store: impl Into<String>, price_per_unit: UnitPrice) -> Self {
        Self {
            store: store.into(),
            price_per_unit,
        }
    }

    pub fn store(&self) -> &str {
        &self.store
    }

    pub fn price_per_unit(&self) -> &UnitPrice {
        &self.price_per_unit
    }

    pub fn price(&self) -> f64 {
        self.price_per_unit.value()
    }

    pub fn unit(&self) -> &str {
        self.price_per_unit.unit()
    }

    pub(crate) fn set_price(&mut self, price_per_unit: UnitPrice) {
        self.price_per_unit = price_per_unit;
    }
}

/// A purchasable thing in the vault.
///
/// Items are never purged; deletion flips `is_deleted` so that completed
/// trips can still be reported on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    name: String,
    category_id: CategoryId,
    price_options: Vec<PriceOption>,
    created_at: Timestamp,
    #[serde(default)]
    is_deleted: bool,
}

impl Item {
    pub(crate) fn new(name: String, category_id: CategoryId, first_option: PriceOption) -> Self {
        Self {
            id: ItemId::new(),
            name,
            category_id,
            price_options: vec![first_option],
            created_at: Timestamp::now(),
            is_deleted: false,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn price_options(&self) -> &[PriceOption] {
        &self.price_options
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    /// Returns the price option for a store, matched case-insensitively.
    pub fn price_at(&self, store: &str) -> Option<&PriceOption> {
        self.price_options.iter().find(|o| same_key(o.store(), store))
    }

    /// True if the item has a price at `store`.
    pub fn offers(&self, store: &str) -> bool {
        self.price_at(store).is_some()
    }

    /// Price used when nothing more specific is known: the preferred
    /// store's option if offered, else the first option.
    pub fn current_price(&self, preferred_store: Option<&str>) -> Option<&PriceOption> {
        preferred_store
            .and_then(|store| self.price_at(store))
            .or_else(|| self.price_options.first())
    }

    pub(crate) fn price_at_mut(&mut self, store: &str) -> Option<&mut PriceOption> {
        self.price_options
            .iter_mut()
            .find(|o| same_key(o.store(), store))
    }

    pub(crate) fn push_option(&mut self, option: PriceOption) {
        self.price_options.push(option);
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.is_deleted = true;
    }
}
