//! Cart lines.
//!
//! A line either points at a catalog item or carries its own ad-hoc
//! payload. The two shapes are a tagged union so a line can never be both.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    differs, require_positive, require_text, CartItemId, ItemId, Quantity, Timestamp,
    ValidationError,
};

/// A shopping-only item: bought on a trip without being in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdHocItem {
    name: String,
    store: String,
    price: f64,
    unit: String,
    /// Category to file the item under if it is merged into the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
}

impl AdHocItem {
    /// Validates and builds an ad-hoc payload.
    ///
    /// # Errors
    ///
    /// - `EmptyField` for a blank name, store or unit
    /// - `NotPositive` for a price ≤ 0
    pub fn new(
        name: &str,
        store: &str,
        price: f64,
        unit: &str,
        category: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: require_text("name", name)?,
            store: require_text("store", store)?,
            price: require_positive("price", price)?,
            unit: require_text("unit", unit)?,
            category: category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> &str {
        &self.store
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Takes the latest price, unit and category from a re-entered payload.
    pub(super) fn refresh_from(&mut self, other: AdHocItem) {
        self.price = other.price;
        self.unit = other.unit;
        if other.category.is_some() {
            self.category = other.category;
        }
    }
}

/// Where a line's item comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartItemSource {
    Catalog { item_id: ItemId },
    AdHoc(AdHocItem),
}

/// What was actually bought for a line.
#[derive(Debug, Clone, PartialEq)]
pub struct Fulfillment {
    pub price: f64,
    pub quantity: f64,
    /// Defaults to the planned unit.
    pub unit: Option<String>,
    /// Defaults to the planned store.
    pub store: Option<String>,
}

impl Fulfillment {
    /// Bought as recorded, at the planned unit and store.
    pub fn new(price: f64, quantity: f64) -> Self {
        Self {
            price,
            quantity,
            unit: None,
            store: None,
        }
    }

    pub fn at_store(mut self, store: impl Into<String>) -> Self {
        self.store = Some(store.into());
        self
    }
}

/// One line of a cart.
///
/// # Invariants
///
/// - `quantity` stays within `[0, 100]`
/// - `is_fulfilled` and `is_skipped_during_shopping` are never both set
/// - `original_planning_quantity` is written only when shopping begins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub(super) id: CartItemId,
    pub(super) source: CartItemSource,
    pub(super) quantity: Quantity,

    // Snapshot taken when shopping begins.
    #[serde(default)]
    pub(super) planned_price: Option<f64>,
    #[serde(default)]
    pub(super) planned_unit: Option<String>,
    #[serde(default)]
    pub(super) planned_store: Option<String>,
    #[serde(default)]
    pub(super) original_planning_quantity: Option<f64>,

    // Recorded on fulfillment.
    #[serde(default)]
    pub(super) actual_price: Option<f64>,
    #[serde(default)]
    pub(super) actual_unit: Option<String>,
    #[serde(default)]
    pub(super) actual_quantity: Option<f64>,
    #[serde(default)]
    pub(super) actual_store: Option<String>,

    #[serde(default)]
    pub(super) is_fulfilled: bool,
    #[serde(default)]
    pub(super) is_skipped_during_shopping: bool,
    #[serde(default)]
    pub(super) added_during_shopping: bool,
    #[serde(default)]
    pub(super) was_edited_during_shopping: bool,

    pub(super) added_at: Timestamp,
}

impl CartItem {
    fn with_source(source: CartItemSource, quantity: Quantity) -> Self {
        Self {
            id: CartItemId::new(),
            source,
            quantity,
            planned_price: None,
            planned_unit: None,
            planned_store: None,
            original_planning_quantity: None,
            actual_price: None,
            actual_unit: None,
            actual_quantity: None,
            actual_store: None,
            is_fulfilled: false,
            is_skipped_during_shopping: false,
            added_during_shopping: false,
            was_edited_during_shopping: false,
            added_at: Timestamp::now(),
        }
    }

    pub(super) fn catalog(item_id: ItemId, quantity: Quantity) -> Self {
        Self::with_source(CartItemSource::Catalog { item_id }, quantity)
    }

    pub(super) fn ad_hoc(payload: AdHocItem, quantity: Quantity) -> Self {
        let mut line = Self::with_source(CartItemSource::AdHoc(payload), quantity);
        line.plan_from_payload();
        line
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> CartItemId {
        self.id
    }

    pub fn source(&self) -> &CartItemSource {
        &self.source
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn planned_price(&self) -> Option<f64> {
        self.planned_price
    }

    pub fn planned_unit(&self) -> Option<&str> {
        self.planned_unit.as_deref()
    }

    pub fn planned_store(&self) -> Option<&str> {
        self.planned_store.as_deref()
    }

    pub fn original_planning_quantity(&self) -> Option<f64> {
        self.original_planning_quantity
    }

    pub fn actual_price(&self) -> Option<f64> {
        self.actual_price
    }

    pub fn actual_unit(&self) -> Option<&str> {
        self.actual_unit.as_deref()
    }

    pub fn actual_quantity(&self) -> Option<f64> {
        self.actual_quantity
    }

    pub fn actual_store(&self) -> Option<&str> {
        self.actual_store.as_deref()
    }

    pub fn is_fulfilled(&self) -> bool {
        self.is_fulfilled
    }

    pub fn is_skipped(&self) -> bool {
        self.is_skipped_during_shopping
    }

    pub fn added_during_shopping(&self) -> bool {
        self.added_during_shopping
    }

    pub fn was_edited_during_shopping(&self) -> bool {
        self.was_edited_during_shopping
    }

    pub fn added_at(&self) -> Timestamp {
        self.added_at
    }

    /// The catalog item behind this line, if any.
    pub fn catalog_item_id(&self) -> Option<ItemId> {
        match &self.source {
            CartItemSource::Catalog { item_id } => Some(*item_id),
            CartItemSource::AdHoc(_) => None,
        }
    }

    /// The ad-hoc payload, if this is a shopping-only line.
    pub fn ad_hoc_item(&self) -> Option<&AdHocItem> {
        match &self.source {
            CartItemSource::AdHoc(payload) => Some(payload),
            CartItemSource::Catalog { .. } => None,
        }
    }

    pub fn is_shopping_only(&self) -> bool {
        self.ad_hoc_item().is_some()
    }

    /// True once shopping has begun with this line in the plan.
    pub fn has_planning_history(&self) -> bool {
        self.original_planning_quantity.is_some()
    }

    /// Store the line is bought at: actual, then planned, then the
    /// ad-hoc payload's store.
    pub fn store(&self) -> Option<&str> {
        self.actual_store
            .as_deref()
            .or(self.planned_store.as_deref())
            .or_else(|| self.ad_hoc_item().map(AdHocItem::store))
    }

    /// True if the recorded purchase departs from the plan.
    pub fn changed_from_plan(&self) -> bool {
        differs(self.actual_price, self.planned_price)
            || differs(self.actual_quantity, self.original_planning_quantity)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations (driven by the Cart aggregate)
    // ─────────────────────────────────────────────────────────────────────────

    pub(super) fn plan_from_payload(&mut self) {
        if let CartItemSource::AdHoc(payload) = &self.source {
            self.planned_price = Some(payload.price());
            self.planned_unit = Some(payload.unit().to_string());
            self.planned_store = Some(payload.store().to_string());
        }
    }

    pub(super) fn clear_fulfillment(&mut self) {
        self.actual_price = None;
        self.actual_unit = None;
        self.actual_quantity = None;
        self.actual_store = None;
        self.is_fulfilled = false;
        self.was_edited_during_shopping = false;
    }

    pub(super) fn mark_skipped(&mut self) {
        self.clear_fulfillment();
        self.is_skipped_during_shopping = true;
        self.quantity = Quantity::ZERO;
    }

    /// Quantity a skipped line comes back with.
    pub(super) fn restored_quantity(&self) -> Quantity {
        Quantity::clamped(self.original_planning_quantity.unwrap_or(1.0).max(1.0))
    }

    pub(super) fn unmark_skipped(&mut self) {
        self.is_skipped_during_shopping = false;
        self.quantity = self.restored_quantity();
    }

    /// True if `f` is exactly what is already recorded.
    pub(super) fn is_fulfilled_with(&self, f: &Fulfillment) -> bool {
        self.is_fulfilled
            && self.actual_price == Some(f.price)
            && self.actual_quantity == Some(f.quantity)
            && (f.unit.is_none() || self.actual_unit == f.unit)
            && (f.store.is_none() || self.actual_store == f.store)
    }

    pub(super) fn record_fulfillment(&mut self, f: Fulfillment) {
        let unit = f.unit.or_else(|| self.planned_unit.clone()).or_else(|| {
            self.ad_hoc_item().map(|p| p.unit().to_string())
        });
        let store = f.store.or_else(|| self.store().map(str::to_string));

        self.actual_price = Some(f.price);
        self.actual_quantity = Some(f.quantity);
        self.actual_unit = unit;
        self.actual_store = store;
        self.quantity = Quantity::clamped(f.quantity);
        self.is_fulfilled = true;
        self.is_skipped_during_shopping = false;
        self.was_edited_during_shopping = self.changed_from_plan();
    }
}
