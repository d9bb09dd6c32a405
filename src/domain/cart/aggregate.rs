//! Cart aggregate entity.
//!
//! A cart is one shopping trip. It moves through planning, shopping and
//! completion while each line tracks what was planned against what was
//! actually bought.
//!
//! # Ownership
//!
//! Carts reference catalog items by id but do NOT own them. Operations that
//! need catalog data borrow the `Vault`; `complete_shopping` is the only one
//! that writes to it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::catalog::{same_key, CatalogError, Item, MergeOutcome, Vault};
use crate::domain::foundation::{
    require_positive, require_text, CartId, CartItemId, EventId, ItemId, Quantity,
    StateMachine, Timestamp, ValidationError,
};

use super::{
    AdHocItem, CartCreated, CartDeleted, CartDetailsChanged, CartError, CartEvent, CartItem,
    CartItemChange, CartItemSource, CartPhaseChanged, CartStatus, Fulfillment,
};

/// Result of a quantity change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuantityOutcome {
    Updated { from: Quantity, to: Quantity },
    /// The line already had that quantity.
    Unchanged,
    /// A line with no planning history reached zero and was dropped.
    Removed,
    /// A planned line reached zero during shopping and was kept as skipped.
    Skipped,
    /// A shopping-only line reached zero. Nothing changed; the caller must
    /// confirm and call `Cart::remove_item`.
    ConfirmationRequired,
}

/// One shopping-only line promoted into the catalog on completion.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedLine {
    pub cart_item_id: CartItemId,
    pub outcome: MergeOutcome,
}

/// What `complete_shopping` did to the catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionReport {
    pub merged: Vec<MergedLine>,
}

/// Cart aggregate - one shopping trip.
///
/// # Invariants
///
/// - `name` is non-empty and `budget` is a non-negative finite amount
/// - `started_at` is set exactly while the cart is shopping or completed
/// - `completed_at` is set exactly while the cart is completed
/// - Lines only change in planning or shopping; completed carts are frozen
///   except for catalog cascades
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    id: CartId,
    name: String,
    budget: f64,
    status: CartStatus,
    created_at: Timestamp,
    updated_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    started_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<Timestamp>,
    items: Vec<CartItem>,

    /// Domain events recorded since the last `take_events`.
    #[serde(skip)]
    domain_events: Vec<CartEvent>,
}

impl Cart {
    /// Creates a new cart in planning.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if name is blank
    /// - `OutOfRange` if budget is negative or not finite
    pub fn new(name: &str, budget: f64) -> Result<Self, CartError> {
        let name = require_text("name", name)?;
        let budget = Self::validate_budget(budget)?;

        let now = Timestamp::now();
        let mut cart = Self {
            id: CartId::new(),
            name,
            budget,
            status: CartStatus::Planning,
            created_at: now,
            updated_at: now,
            started_at: None,
            completed_at: None,
            items: Vec::new(),
            domain_events: Vec::new(),
        };
        cart.domain_events.push(CartEvent::Created(CartCreated {
            event_id: EventId::new(),
            cart_id: cart.id,
            name: cart.name.clone(),
            budget,
            created_at: now,
        }));
        Ok(cart)
    }

    fn validate_budget(budget: f64) -> Result<f64, ValidationError> {
        if !budget.is_finite() || budget < 0.0 {
            return Err(ValidationError::out_of_range("budget", 0.0, f64::MAX, budget));
        }
        Ok(budget)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> CartId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn status(&self) -> CartStatus {
        self.status
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn started_at(&self) -> Option<Timestamp> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn find_item(&self, id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// The line referencing a catalog item, if any.
    pub fn line_for(&self, item_id: ItemId) -> Option<&CartItem> {
        self.items
            .iter()
            .find(|i| i.catalog_item_id() == Some(item_id))
    }

    /// Takes accumulated domain events, clearing the internal buffer.
    pub fn take_events(&mut self) -> Vec<CartEvent> {
        std::mem::take(&mut self.domain_events)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Details
    // ─────────────────────────────────────────────────────────────────────────

    /// Renames the cart.
    pub fn rename(&mut self, name: &str) -> Result<(), CartError> {
        self.ensure_editable("rename the cart")?;
        let name = require_text("name", name)?;
        if name == self.name {
            return Ok(());
        }
        self.name = name;
        self.record_details_change();
        Ok(())
    }

    /// Changes the trip budget.
    pub fn set_budget(&mut self, budget: f64) -> Result<(), CartError> {
        self.ensure_editable("change the budget")?;
        let budget = Self::validate_budget(budget)?;
        if (budget - self.budget).abs() < f64::EPSILON {
            return Ok(());
        }
        self.budget = budget;
        self.record_details_change();
        Ok(())
    }

    fn record_details_change(&mut self) {
        self.touch();
        self.domain_events
            .push(CartEvent::DetailsChanged(CartDetailsChanged {
                event_id: EventId::new(),
                cart_id: self.id,
                name: self.name.clone(),
                budget: self.budget,
                changed_at: self.updated_at,
            }));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Starts the trip.
    ///
    /// Snapshots each line's quantity as its original planning quantity and
    /// resolves planned price, unit and store: catalog lines from the price
    /// option at their planned store (else the item's first option),
    /// shopping-only lines from their own payload.
    ///
    /// # Errors
    ///
    /// - `InvalidPhase` unless the cart is planning
    pub fn begin_shopping(&mut self, vault: &Vault) -> Result<(), CartError> {
        if !self.status.is_planning() {
            return Err(CartError::invalid_phase("begin shopping", self.status));
        }

        for line in &mut self.items {
            if line.original_planning_quantity.is_none() {
                line.original_planning_quantity = Some(line.quantity.value());
            }
            match line.catalog_item_id() {
                Some(item_id) => {
                    let option = vault
                        .find_item_by_id(item_id)
                        .and_then(|item| item.current_price(line.planned_store.as_deref()));
                    if let Some(option) = option {
                        line.planned_price = Some(option.price());
                        line.planned_unit = Some(option.unit().to_string());
                        line.planned_store = Some(option.store().to_string());
                    }
                }
                None => line.plan_from_payload(),
            }
        }

        self.change_phase(CartStatus::Shopping)?;
        self.started_at = Some(self.updated_at);
        Ok(())
    }

    /// Abandons the trip in progress and goes back to the plan.
    ///
    /// Everything recorded while shopping is discarded: fulfillment is
    /// cleared, skipped lines return at their planned quantity and lines
    /// that were planned get their original quantity back. Lines added
    /// during the trip stay in the cart as ordinary plan lines.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` unless the cart is shopping
    pub fn return_to_planning(&mut self) -> Result<(), CartError> {
        self.status.transition_to(CartStatus::Planning)?;

        for line in &mut self.items {
            if let Some(original) = line.original_planning_quantity {
                line.quantity = Quantity::clamped(original);
            }
            if line.is_skipped_during_shopping {
                line.unmark_skipped();
            }
            line.clear_fulfillment();
            line.added_during_shopping = false;
            line.original_planning_quantity = None;
        }

        self.change_phase(CartStatus::Planning)?;
        self.started_at = None;
        Ok(())
    }

    /// Finishes the trip.
    ///
    /// Shopping-only lines whose id maps to `true` in `merge_selections` are
    /// promoted into the vault, filed under their own category or
    /// `category_fallback`. Selecting a catalog-backed line has no effect.
    ///
    /// # Errors
    ///
    /// - `InvalidPhase` unless the cart is shopping
    /// - `CartItemNotFound` if a selected id is not in this cart
    /// - `EmptyField` if a merge needs `category_fallback` and it is blank
    /// - `Catalog` if the vault rejects a merge
    pub fn complete_shopping(
        &mut self,
        vault: &mut Vault,
        merge_selections: &HashMap<CartItemId, bool>,
        category_fallback: &str,
    ) -> Result<CompletionReport, CartError> {
        if !self.status.is_shopping() {
            return Err(CartError::invalid_phase("complete shopping", self.status));
        }

        let selected: Vec<CartItemId> = merge_selections
            .iter()
            .filter(|(_, merge)| **merge)
            .map(|(id, _)| *id)
            .collect();
        if let Some(missing) = selected.iter().find(|id| self.find_item(**id).is_none()) {
            return Err(CartError::CartItemNotFound(*missing));
        }

        let to_merge: Vec<(CartItemId, AdHocItem)> = self
            .items
            .iter()
            .filter(|line| selected.contains(&line.id))
            .filter_map(|line| line.ad_hoc_item().map(|p| (line.id, p.clone())))
            .collect();
        if to_merge.iter().any(|(_, p)| p.category().is_none()) {
            require_text("category", category_fallback)?;
        }

        let mut report = CompletionReport::default();
        for (cart_item_id, payload) in to_merge {
            let outcome = vault.merge_ad_hoc_into_catalog(&payload, category_fallback, self.id)?;
            report.merged.push(MergedLine {
                cart_item_id,
                outcome,
            });
        }

        self.change_phase(CartStatus::Completed)?;
        self.completed_at = Some(self.updated_at);
        Ok(report)
    }

    /// Reopens a completed trip for more shopping.
    ///
    /// # Errors
    ///
    /// - `InvalidPhase` unless the cart is completed
    pub fn reopen(&mut self) -> Result<(), CartError> {
        if !self.status.is_completed() {
            return Err(CartError::invalid_phase("reopen", self.status));
        }
        self.change_phase(CartStatus::Shopping)?;
        self.completed_at = None;
        Ok(())
    }

    /// Consumes the cart, returning the event announcing its removal.
    pub fn delete(self) -> CartEvent {
        CartEvent::Deleted(CartDeleted {
            event_id: EventId::new(),
            cart_id: self.id,
            name: self.name,
            deleted_at: Timestamp::now(),
        })
    }

    fn change_phase(&mut self, to: CartStatus) -> Result<(), CartError> {
        let from = self.status;
        self.status = from.transition_to(to)?;
        self.touch();
        self.domain_events
            .push(CartEvent::PhaseChanged(CartPhaseChanged {
                event_id: EventId::new(),
                cart_id: self.id,
                from,
                to,
                changed_at: self.updated_at,
            }));
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Adding lines
    // ─────────────────────────────────────────────────────────────────────────

    /// Puts a catalog item in the cart.
    ///
    /// If a line already references the item its quantity grows (and a
    /// skipped line comes back). Otherwise a new line is planned at `store`,
    /// or at the item's first price option when no store is given.
    ///
    /// # Errors
    ///
    /// - `InvalidPhase` if the cart is completed
    /// - `NotPositive` if quantity ≤ 0
    /// - `Catalog(ItemDeleted)` for a deleted item
    /// - `Catalog(StoreNotOffered)` if the item has no price at `store`
    pub fn add_catalog_item(
        &mut self,
        item: &Item,
        quantity: f64,
        store: Option<&str>,
    ) -> Result<CartItemId, CartError> {
        self.ensure_editable("add items")?;
        let quantity = Quantity::clamped(require_positive("quantity", quantity)?);
        if item.is_deleted() {
            return Err(CatalogError::ItemDeleted(item.id()).into());
        }
        let option = match store {
            Some(store) => item
                .price_at(store)
                .ok_or_else(|| CatalogError::store_not_offered(item.id(), store))?,
            None => item
                .current_price(None)
                .ok_or_else(|| CatalogError::store_not_offered(item.id(), ""))?,
        };

        if let Some(idx) = self
            .items
            .iter()
            .position(|l| l.catalog_item_id() == Some(item.id()))
        {
            let line = &mut self.items[idx];
            let from = line.quantity;
            line.quantity = from.saturating_add(quantity);
            line.is_skipped_during_shopping = false;
            let (id, to) = (line.id, line.quantity);
            self.record_item_change(
                id,
                CartItemChange::QuantityChanged {
                    from: from.value(),
                    to: to.value(),
                },
            );
            return Ok(id);
        }

        let mut line = CartItem::catalog(item.id(), quantity);
        line.planned_price = Some(option.price());
        line.planned_unit = Some(option.unit().to_string());
        line.planned_store = Some(option.store().to_string());
        line.added_during_shopping = self.status.is_shopping();
        Ok(self.push_line(line))
    }

    /// Puts a shopping-only item in the cart.
    ///
    /// Lines are matched on (name, store), case-insensitively, among this
    /// cart's shopping-only lines. A skipped or emptied match is reactivated
    /// with `quantity`; an active match grows by `quantity`. Either way the
    /// match takes the new price. Otherwise a new line is added.
    ///
    /// # Errors
    ///
    /// - `InvalidPhase` unless the cart is shopping
    /// - validation errors for blank name/store/unit or price/quantity ≤ 0
    #[allow(clippy::too_many_arguments)]
    pub fn add_ad_hoc_item(
        &mut self,
        name: &str,
        store: &str,
        price: f64,
        unit: &str,
        quantity: f64,
        category: Option<String>,
    ) -> Result<CartItemId, CartError> {
        if !self.status.is_shopping() {
            return Err(CartError::invalid_phase("add shopping-only items", self.status));
        }
        let payload = AdHocItem::new(name, store, price, unit, category)?;
        let quantity = Quantity::clamped(require_positive("quantity", quantity)?);

        let existing = self.items.iter().position(|l| {
            l.ad_hoc_item().is_some_and(|p| {
                same_key(p.name(), payload.name()) && same_key(p.store(), payload.store())
            })
        });
        let Some(idx) = existing else {
            let mut line = CartItem::ad_hoc(payload, quantity);
            line.added_during_shopping = true;
            return Ok(self.push_line(line));
        };

        let line = &mut self.items[idx];
        if let CartItemSource::AdHoc(current) = &mut line.source {
            current.refresh_from(payload);
        }
        line.plan_from_payload();

        let change = if line.is_skipped_during_shopping || line.quantity.is_zero() {
            line.is_skipped_during_shopping = false;
            line.quantity = quantity;
            CartItemChange::Reactivated {
                quantity: quantity.value(),
            }
        } else {
            let from = line.quantity;
            line.quantity = from.saturating_add(quantity);
            CartItemChange::QuantityChanged {
                from: from.value(),
                to: line.quantity.value(),
            }
        };
        let id = line.id;
        self.record_item_change(id, change);
        Ok(id)
    }

    fn push_line(&mut self, line: CartItem) -> CartItemId {
        let id = line.id;
        let quantity = line.quantity.value();
        self.items.push(line);
        self.record_item_change(id, CartItemChange::Added { quantity });
        id
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Quantity
    // ─────────────────────────────────────────────────────────────────────────

    /// Sets a line's quantity, clamped to `[0, 100]`.
    ///
    /// Setting the current value is a no-op. Reaching zero removes a line
    /// with no planning history, skips a line that was planned, and asks
    /// for confirmation on a shopping-only line. A positive value on a
    /// skipped line brings it back.
    ///
    /// # Errors
    ///
    /// - `InvalidPhase` if the cart is completed
    /// - `InvalidFormat` if `quantity` is not a number
    /// - `CartItemNotFound` for an unknown line
    pub fn set_quantity(
        &mut self,
        id: CartItemId,
        quantity: f64,
    ) -> Result<QuantityOutcome, CartError> {
        self.ensure_editable("change quantities")?;
        if quantity.is_nan() {
            return Err(ValidationError::invalid_format("quantity", "not a number").into());
        }
        let target = Quantity::clamped(quantity);
        let idx = self.index_of(id)?;
        let line = &mut self.items[idx];

        if line.quantity == target {
            return Ok(QuantityOutcome::Unchanged);
        }

        if target.is_zero() {
            if line.is_shopping_only() {
                return Ok(QuantityOutcome::ConfirmationRequired);
            }
            if line.has_planning_history() {
                line.mark_skipped();
                self.record_item_change(id, CartItemChange::Skipped);
                return Ok(QuantityOutcome::Skipped);
            }
            self.items.remove(idx);
            self.record_item_change(id, CartItemChange::Removed);
            return Ok(QuantityOutcome::Removed);
        }

        let from = line.quantity;
        line.quantity = target;
        line.is_skipped_during_shopping = false;
        self.record_item_change(
            id,
            CartItemChange::QuantityChanged {
                from: from.value(),
                to: target.value(),
            },
        );
        Ok(QuantityOutcome::Updated { from, to: target })
    }

    /// Steps up to the next whole unit.
    pub fn increment_quantity(&mut self, id: CartItemId) -> Result<QuantityOutcome, CartError> {
        let next = self.line(id)?.quantity.increment();
        self.set_quantity(id, next.value())
    }

    /// Steps down to the previous whole unit.
    pub fn decrement_quantity(&mut self, id: CartItemId) -> Result<QuantityOutcome, CartError> {
        let next = self.line(id)?.quantity.decrement();
        self.set_quantity(id, next.value())
    }

    /// Removes a line outright. This is the confirmed path after a
    /// `ConfirmationRequired` outcome.
    ///
    /// # Errors
    ///
    /// - `InvalidPhase` if the cart is completed
    /// - `CartItemNotFound` for an unknown line
    pub fn remove_item(&mut self, id: CartItemId) -> Result<(), CartError> {
        self.ensure_editable("remove items")?;
        let idx = self.index_of(id)?;
        self.items.remove(idx);
        self.record_item_change(id, CartItemChange::Removed);
        Ok(())
    }

    /// Drops every line pointing at a catalog item, in any phase. Used when
    /// the item is deleted from the catalog. Returns how many lines went.
    pub fn purge_catalog_item(&mut self, item_id: ItemId) -> usize {
        let removed: Vec<CartItemId> = self
            .items
            .iter()
            .filter(|l| l.catalog_item_id() == Some(item_id))
            .map(|l| l.id)
            .collect();
        if removed.is_empty() {
            return 0;
        }
        self.items.retain(|l| l.catalog_item_id() != Some(item_id));
        for id in &removed {
            self.record_item_change(*id, CartItemChange::Removed);
        }
        removed.len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fulfillment and skipping
    // ─────────────────────────────────────────────────────────────────────────

    /// Records what was actually bought for a line.
    ///
    /// The line's quantity follows the purchased quantity. Returns false when
    /// the same purchase was already recorded.
    ///
    /// # Errors
    ///
    /// - `InvalidPhase` unless the cart is shopping
    /// - `NotPositive` if price or quantity ≤ 0
    /// - `OutOfRange` if quantity > 100
    /// - `CartItemNotFound` for an unknown line
    pub fn fulfill(&mut self, id: CartItemId, fulfillment: Fulfillment) -> Result<bool, CartError> {
        self.ensure_shopping("fulfill items")?;
        require_positive("price", fulfillment.price)?;
        require_positive("quantity", fulfillment.quantity)?;
        Quantity::try_new(fulfillment.quantity)?;

        let idx = self.index_of(id)?;
        let line = &mut self.items[idx];
        if line.is_fulfilled_with(&fulfillment) {
            return Ok(false);
        }
        let change = CartItemChange::Fulfilled {
            price: fulfillment.price,
            quantity: fulfillment.quantity,
        };
        line.record_fulfillment(fulfillment);
        self.record_item_change(id, change);
        Ok(true)
    }

    /// Clears a recorded purchase. The actual values are discarded; the
    /// line keeps its current quantity.
    pub fn unfulfill(&mut self, id: CartItemId) -> Result<bool, CartError> {
        self.ensure_shopping("unfulfill items")?;
        let idx = self.index_of(id)?;
        let line = &mut self.items[idx];
        if !line.is_fulfilled {
            return Ok(false);
        }
        line.clear_fulfillment();
        self.record_item_change(id, CartItemChange::Unfulfilled);
        Ok(true)
    }

    /// Marks a line as deliberately not bought on this trip.
    pub fn skip(&mut self, id: CartItemId) -> Result<bool, CartError> {
        self.ensure_shopping("skip items")?;
        let idx = self.index_of(id)?;
        let line = &mut self.items[idx];
        if line.is_skipped_during_shopping {
            return Ok(false);
        }
        line.mark_skipped();
        self.record_item_change(id, CartItemChange::Skipped);
        Ok(true)
    }

    /// Brings a skipped line back at `max(1, original planning quantity)`.
    pub fn unskip(&mut self, id: CartItemId) -> Result<bool, CartError> {
        self.ensure_shopping("unskip items")?;
        let idx = self.index_of(id)?;
        let line = &mut self.items[idx];
        if !line.is_skipped_during_shopping {
            return Ok(false);
        }
        line.unmark_skipped();
        let quantity = line.quantity.value();
        self.record_item_change(id, CartItemChange::Unskipped { quantity });
        Ok(true)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn ensure_editable(&self, operation: &'static str) -> Result<(), CartError> {
        if self.status.is_editable() {
            Ok(())
        } else {
            Err(CartError::invalid_phase(operation, self.status))
        }
    }

    fn ensure_shopping(&self, operation: &'static str) -> Result<(), CartError> {
        if self.status.is_shopping() {
            Ok(())
        } else {
            Err(CartError::invalid_phase(operation, self.status))
        }
    }

    fn index_of(&self, id: CartItemId) -> Result<usize, CartError> {
        self.items
            .iter()
            .position(|l| l.id == id)
            .ok_or(CartError::CartItemNotFound(id))
    }

    fn line(&self, id: CartItemId) -> Result<&CartItem, CartError> {
        self.find_item(id).ok_or(CartError::CartItemNotFound(id))
    }

    fn record_item_change(&mut self, cart_item_id: CartItemId, change: CartItemChange) {
        self.touch();
        self.domain_events
            .push(CartEvent::item_changed(self.id, cart_item_id, change));
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use proptest::prelude::*;

    struct Trip {
        vault: Vault,
        cart: Cart,
        milk: ItemId,
        bread: ItemId,
    }

    fn trip() -> Trip {
        let mut vault = Vault::new();
        let milk = vault.add_item("Milk", "Dairy", "StoreA", 2.5, "L").unwrap();
        vault.add_price_option(milk, "StoreB", 2.0, "L").unwrap();
        let bread = vault.add_item("Bread", "Bakery", "StoreA", 3.0, "loaf").unwrap();
        let cart = Cart::new("Weekly", 200.0).unwrap();
        Trip {
            vault,
            cart,
            milk,
            bread,
        }
    }

    impl Trip {
        fn add(&mut self, item_id: ItemId, quantity: f64, store: Option<&str>) -> CartItemId {
            let item = self.vault.find_item_by_id(item_id).unwrap().clone();
            self.cart.add_catalog_item(&item, quantity, store).unwrap()
        }
    }

    fn shopping_with_milk() -> (Trip, CartItemId) {
        let mut t = trip();
        let line = t.add(t.milk, 2.0, Some("StoreA"));
        t.cart.begin_shopping(&t.vault).unwrap();
        (t, line)
    }

    // ───────────────────────────────────────────────────────────────
    // Creation and details
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn new_cart_starts_planning_with_created_event() {
        let mut cart = Cart::new("  Weekly ", 120.0).unwrap();
        assert_eq!(cart.name(), "Weekly");
        assert_eq!(cart.status(), CartStatus::Planning);
        assert!(cart.started_at().is_none());

        let events = cart.take_events();
        assert!(matches!(&events[..], [CartEvent::Created(e)] if e.budget == 120.0));
    }

    #[test]
    fn new_cart_validates_name_and_budget() {
        assert_eq!(
            Cart::new(" ", 10.0).unwrap_err(),
            CartError::Validation(ValidationError::empty_field("name"))
        );
        assert_eq!(Cart::new("Trip", -1.0).unwrap_err().code(), ErrorCode::OutOfRange);
        assert!(Cart::new("Trip", f64::NAN).is_err());
        assert!(Cart::new("Trip", 0.0).is_ok());
    }

    #[test]
    fn rename_and_budget_record_one_event_per_change() {
        let mut cart = Cart::new("Weekly", 100.0).unwrap();
        cart.take_events();

        cart.rename("Party").unwrap();
        cart.rename("Party").unwrap();
        cart.set_budget(150.0).unwrap();

        assert_eq!(cart.name(), "Party");
        assert_eq!(cart.budget(), 150.0);
        assert_eq!(cart.take_events().len(), 2);
    }

    // ───────────────────────────────────────────────────────────────
    // Lifecycle
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn begin_shopping_snapshots_plan() {
        let (t, line) = shopping_with_milk();
        let line = t.cart.find_item(line).unwrap();

        assert_eq!(t.cart.status(), CartStatus::Shopping);
        assert!(t.cart.started_at().is_some());
        assert_eq!(line.original_planning_quantity(), Some(2.0));
        assert_eq!(line.planned_price(), Some(2.5));
        assert_eq!(line.planned_unit(), Some("L"));
        assert_eq!(line.planned_store(), Some("StoreA"));
    }

    #[test]
    fn begin_shopping_uses_current_catalog_price_at_planned_store() {
        let mut t = trip();
        let line = t.add(t.milk, 1.0, Some("StoreB"));
        t.vault.update_price(t.milk, "StoreB", 2.2).unwrap();

        t.cart.begin_shopping(&t.vault).unwrap();

        let line = t.cart.find_item(line).unwrap();
        assert_eq!(line.planned_price(), Some(2.2));
        assert_eq!(line.planned_store(), Some("StoreB"));
    }

    #[test]
    fn begin_shopping_requires_planning() {
        let (mut t, _) = shopping_with_milk();
        let err = t.cart.begin_shopping(&t.vault).unwrap_err();
        assert!(err.is_state_error());
    }

    #[test]
    fn invalid_transitions_are_state_errors() {
        let mut t = trip();
        assert!(t.cart.return_to_planning().unwrap_err().is_state_error());
        assert!(t.cart.reopen().unwrap_err().is_state_error());
        assert!(t
            .cart
            .complete_shopping(&mut t.vault, &HashMap::new(), "Uncategorized")
            .unwrap_err()
            .is_state_error());
    }

    #[test]
    fn phase_changes_are_recorded() {
        let (mut t, _) = shopping_with_milk();
        t.cart
            .complete_shopping(&mut t.vault, &HashMap::new(), "Uncategorized")
            .unwrap();
        t.cart.reopen().unwrap();

        let phases: Vec<(CartStatus, CartStatus)> = t
            .cart
            .take_events()
            .into_iter()
            .filter_map(|e| match e {
                CartEvent::PhaseChanged(p) => Some((p.from, p.to)),
                _ => None,
            })
            .collect();
        assert_eq!(
            phases,
            vec![
                (CartStatus::Planning, CartStatus::Shopping),
                (CartStatus::Shopping, CartStatus::Completed),
                (CartStatus::Completed, CartStatus::Shopping),
            ]
        );
        assert!(t.cart.completed_at().is_none());
    }

    #[test]
    fn return_to_planning_resets_to_pure_plan() {
        let (mut t, milk) = shopping_with_milk();
        let bread = t.add(t.bread, 1.0, None);
        t.cart.fulfill(milk, Fulfillment::new(3.0, 4.0)).unwrap();
        t.cart.skip(bread).unwrap();
        let extra = t
            .cart
            .add_ad_hoc_item("Snacks", "StoreA", 20.0, "bag", 1.0, None)
            .unwrap();

        t.cart.return_to_planning().unwrap();

        assert_eq!(t.cart.status(), CartStatus::Planning);
        assert!(t.cart.started_at().is_none());
        let milk = t.cart.find_item(milk).unwrap();
        assert!(!milk.is_fulfilled());
        assert_eq!(milk.actual_price(), None);
        assert_eq!(milk.quantity().value(), 2.0);
        assert_eq!(milk.original_planning_quantity(), None);
        let bread = t.cart.find_item(bread).unwrap();
        assert!(!bread.is_skipped());
        assert_eq!(bread.quantity(), Quantity::ONE);
        let extra = t.cart.find_item(extra).unwrap();
        assert!(!extra.added_during_shopping());
    }

    #[test]
    fn complete_shopping_merges_selected_ad_hoc_lines() {
        let (mut t, _) = shopping_with_milk();
        let snacks = t
            .cart
            .add_ad_hoc_item("Snacks", "StoreA", 20.0, "bag", 1.0, Some("pantry".into()))
            .unwrap();
        let soda = t
            .cart
            .add_ad_hoc_item("Soda", "StoreA", 1.5, "can", 6.0, None)
            .unwrap();

        let selections = HashMap::from([(snacks, true), (soda, false)]);
        let report = t
            .cart
            .complete_shopping(&mut t.vault, &selections, "Uncategorized")
            .unwrap();

        assert_eq!(t.cart.status(), CartStatus::Completed);
        assert!(t.cart.completed_at().is_some());
        assert_eq!(report.merged.len(), 1);
        assert_eq!(report.merged[0].cart_item_id, snacks);

        let item = t.vault.find_item_by_id(report.merged[0].outcome.item_id()).unwrap();
        assert_eq!(item.name(), "Snacks");
        let option = item.price_at("StoreA").unwrap();
        assert_eq!((option.price(), option.unit()), (20.0, "bag"));
        assert!(!t.vault.contains("Soda", "StoreA"));
    }

    #[test]
    fn complete_shopping_rejects_unknown_selection() {
        let (mut t, _) = shopping_with_milk();
        let stray = CartItemId::new();
        let err = t
            .cart
            .complete_shopping(&mut t.vault, &HashMap::from([(stray, true)]), "Uncategorized")
            .unwrap_err();
        assert_eq!(err, CartError::CartItemNotFound(stray));
        assert!(t.cart.status().is_shopping());
    }

    #[test]
    fn complete_shopping_needs_fallback_for_uncategorized_merge() {
        let (mut t, _) = shopping_with_milk();
        let soda = t
            .cart
            .add_ad_hoc_item("Soda", "StoreA", 1.5, "can", 6.0, None)
            .unwrap();
        let err = t
            .cart
            .complete_shopping(&mut t.vault, &HashMap::from([(soda, true)]), " ")
            .unwrap_err();
        assert!(err.is_validation());
        assert!(t.cart.status().is_shopping());
    }

    #[test]
    fn delete_consumes_cart() {
        let cart = Cart::new("Weekly", 10.0).unwrap();
        let id = cart.id();
        let event = cart.delete();
        assert!(matches!(event, CartEvent::Deleted(e) if e.cart_id == id));
    }

    // ───────────────────────────────────────────────────────────────
    // Adding lines
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn adding_same_catalog_item_grows_line() {
        let mut t = trip();
        let first = t.add(t.milk, 1.5, None);
        let second = t.add(t.milk, 1.0, None);

        assert_eq!(first, second);
        assert_eq!(t.cart.item_count(), 1);
        assert_eq!(t.cart.find_item(first).unwrap().quantity().value(), 2.5);
    }

    #[test]
    fn catalog_line_plans_at_requested_store() {
        let mut t = trip();
        let line = t.add(t.milk, 1.0, Some("storeb"));
        let line = t.cart.find_item(line).unwrap();
        assert_eq!(line.planned_store(), Some("StoreB"));
        assert_eq!(line.planned_price(), Some(2.0));
        assert!(!line.added_during_shopping());
    }

    #[test]
    fn add_catalog_item_rejects_bad_input() {
        let mut t = trip();
        let item = t.vault.find_item_by_id(t.milk).unwrap().clone();

        assert!(t.cart.add_catalog_item(&item, 0.0, None).unwrap_err().is_validation());
        assert_eq!(
            t.cart.add_catalog_item(&item, 1.0, Some("StoreZ")).unwrap_err(),
            CartError::Catalog(CatalogError::store_not_offered(t.milk, "StoreZ"))
        );

        t.vault.delete_item(t.milk).unwrap();
        let deleted = t.vault.find_item_including_deleted(t.milk).unwrap().clone();
        assert_eq!(
            t.cart.add_catalog_item(&deleted, 1.0, None).unwrap_err().code(),
            ErrorCode::ItemDeleted
        );
    }

    #[test]
    fn items_added_while_shopping_are_flagged() {
        let (mut t, _) = shopping_with_milk();
        let bread = t.add(t.bread, 1.0, None);
        let bread = t.cart.find_item(bread).unwrap();
        assert!(bread.added_during_shopping());
        assert!(!bread.has_planning_history());
    }

    #[test]
    fn ad_hoc_items_require_shopping() {
        let mut t = trip();
        let err = t
            .cart
            .add_ad_hoc_item("Snacks", "StoreA", 20.0, "bag", 1.0, None)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidCartPhase);
    }

    #[test]
    fn ad_hoc_duplicates_merge_case_insensitively() {
        let (mut t, _) = shopping_with_milk();
        let first = t
            .cart
            .add_ad_hoc_item("Snacks", "StoreA", 20.0, "bag", 1.0, None)
            .unwrap();
        let second = t
            .cart
            .add_ad_hoc_item("snacks", "storea", 22.0, "bag", 2.0, None)
            .unwrap();

        assert_eq!(first, second);
        let line = t.cart.find_item(first).unwrap();
        assert_eq!(line.quantity().value(), 3.0);
        assert_eq!(line.ad_hoc_item().unwrap().price(), 22.0);
        assert_eq!(line.planned_price(), Some(22.0));
    }

    #[test]
    fn skipped_ad_hoc_match_is_reactivated() {
        let (mut t, _) = shopping_with_milk();
        let line = t
            .cart
            .add_ad_hoc_item("Snacks", "StoreA", 20.0, "bag", 3.0, None)
            .unwrap();
        t.cart.skip(line).unwrap();
        t.cart.take_events();

        let again = t
            .cart
            .add_ad_hoc_item("Snacks", "StoreA", 18.0, "bag", 1.0, None)
            .unwrap();

        assert_eq!(again, line);
        let line = t.cart.find_item(line).unwrap();
        assert!(!line.is_skipped());
        assert_eq!(line.quantity(), Quantity::ONE);
        let events = t.cart.take_events();
        assert!(matches!(
            &events[..],
            [CartEvent::ItemChanged(e)] if e.change == CartItemChange::Reactivated { quantity: 1.0 }
        ));
    }

    #[test]
    fn same_ad_hoc_name_at_other_store_is_a_new_line() {
        let (mut t, _) = shopping_with_milk();
        let a = t
            .cart
            .add_ad_hoc_item("Snacks", "StoreA", 20.0, "bag", 1.0, None)
            .unwrap();
        let b = t
            .cart
            .add_ad_hoc_item("Snacks", "StoreB", 19.0, "bag", 1.0, None)
            .unwrap();
        assert_ne!(a, b);
    }

    // ───────────────────────────────────────────────────────────────
    // Quantity
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn set_quantity_is_idempotent() {
        let mut t = trip();
        let line = t.add(t.milk, 1.0, None);
        t.cart.take_events();

        let first = t.cart.set_quantity(line, 4.0).unwrap();
        let snapshot = t.cart.find_item(line).cloned();
        let second = t.cart.set_quantity(line, 4.0).unwrap();

        assert!(matches!(first, QuantityOutcome::Updated { .. }));
        assert_eq!(second, QuantityOutcome::Unchanged);
        assert_eq!(t.cart.find_item(line).cloned(), snapshot);
        assert_eq!(t.cart.take_events().len(), 1);
    }

    #[test]
    fn set_quantity_clamps() {
        let mut t = trip();
        let line = t.add(t.milk, 1.0, None);
        t.cart.set_quantity(line, 250.0).unwrap();
        assert_eq!(t.cart.find_item(line).unwrap().quantity().value(), Quantity::MAX);
        assert!(t.cart.set_quantity(line, f64::NAN).unwrap_err().is_validation());
    }

    #[test]
    fn zero_while_planning_removes_line() {
        let mut t = trip();
        let line = t.add(t.milk, 1.0, None);
        assert_eq!(t.cart.set_quantity(line, 0.0).unwrap(), QuantityOutcome::Removed);
        assert!(t.cart.find_item(line).is_none());
    }

    #[test]
    fn zero_while_shopping_skips_planned_line() {
        let (mut t, line) = shopping_with_milk();
        assert_eq!(t.cart.set_quantity(line, 0.0).unwrap(), QuantityOutcome::Skipped);

        let line = t.cart.find_item(line).unwrap();
        assert!(line.is_skipped());
        assert_eq!(line.quantity(), Quantity::ZERO);
    }

    #[test]
    fn zero_removes_line_added_mid_trip() {
        let (mut t, _) = shopping_with_milk();
        let bread = t.add(t.bread, 1.0, None);
        assert_eq!(t.cart.set_quantity(bread, 0.0).unwrap(), QuantityOutcome::Removed);
    }

    #[test]
    fn zero_on_ad_hoc_line_needs_confirmation() {
        let (mut t, _) = shopping_with_milk();
        let line = t
            .cart
            .add_ad_hoc_item("Snacks", "StoreA", 20.0, "bag", 1.0, None)
            .unwrap();
        t.cart.take_events();

        assert_eq!(
            t.cart.set_quantity(line, 0.0).unwrap(),
            QuantityOutcome::ConfirmationRequired
        );
        assert_eq!(t.cart.find_item(line).unwrap().quantity(), Quantity::ONE);
        assert!(t.cart.take_events().is_empty());

        t.cart.remove_item(line).unwrap();
        assert!(t.cart.find_item(line).is_none());
    }

    #[test]
    fn stepping_converges_to_whole_units() {
        let mut t = trip();
        let line = t.add(t.milk, 1.5, None);

        t.cart.increment_quantity(line).unwrap();
        assert_eq!(t.cart.find_item(line).unwrap().quantity().value(), 3.0);

        t.cart.set_quantity(line, 2.5).unwrap();
        t.cart.decrement_quantity(line).unwrap();
        assert_eq!(t.cart.find_item(line).unwrap().quantity().value(), 1.0);
    }

    #[test]
    fn positive_quantity_unskips() {
        let (mut t, line) = shopping_with_milk();
        t.cart.skip(line).unwrap();
        t.cart.increment_quantity(line).unwrap();

        let line = t.cart.find_item(line).unwrap();
        assert!(!line.is_skipped());
        assert_eq!(line.quantity(), Quantity::ONE);
    }

    #[test]
    fn completed_cart_is_frozen() {
        let (mut t, line) = shopping_with_milk();
        t.cart
            .complete_shopping(&mut t.vault, &HashMap::new(), "Uncategorized")
            .unwrap();
        assert!(t.cart.set_quantity(line, 3.0).unwrap_err().is_state_error());
        assert!(t.cart.remove_item(line).unwrap_err().is_state_error());
    }

    #[test]
    fn purge_removes_lines_in_any_phase() {
        let (mut t, _) = shopping_with_milk();
        t.cart
            .complete_shopping(&mut t.vault, &HashMap::new(), "Uncategorized")
            .unwrap();
        assert_eq!(t.cart.purge_catalog_item(t.milk), 1);
        assert_eq!(t.cart.purge_catalog_item(t.milk), 0);
        assert_eq!(t.cart.item_count(), 0);
    }

    // ───────────────────────────────────────────────────────────────
    // Fulfillment and skipping
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn fulfill_requires_shopping() {
        let mut t = trip();
        let line = t.add(t.milk, 1.0, None);
        let err = t.cart.fulfill(line, Fulfillment::new(2.5, 1.0)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidCartPhase);
    }

    #[test]
    fn fulfill_validates_amounts() {
        let (mut t, line) = shopping_with_milk();
        assert!(t.cart.fulfill(line, Fulfillment::new(0.0, 1.0)).unwrap_err().is_validation());
        assert!(t.cart.fulfill(line, Fulfillment::new(1.0, -1.0)).unwrap_err().is_validation());
        assert!(t.cart.fulfill(line, Fulfillment::new(1.0, 101.0)).unwrap_err().is_validation());
        assert!(!t.cart.find_item(line).unwrap().is_fulfilled());
    }

    #[test]
    fn fulfill_records_actuals_and_edit_flag() {
        let (mut t, line) = shopping_with_milk();
        assert!(t.cart.fulfill(line, Fulfillment::new(3.0, 2.0)).unwrap());

        let l = t.cart.find_item(line).unwrap();
        assert!(l.is_fulfilled());
        assert_eq!(l.actual_price(), Some(3.0));
        assert_eq!(l.actual_store(), Some("StoreA"));
        assert!(l.was_edited_during_shopping());

        assert!(!t.cart.fulfill(line, Fulfillment::new(3.0, 2.0)).unwrap());
    }

    #[test]
    fn fulfilling_a_skipped_line_unskips_it() {
        let (mut t, line) = shopping_with_milk();
        t.cart.skip(line).unwrap();
        t.cart.fulfill(line, Fulfillment::new(2.5, 1.0)).unwrap();

        let l = t.cart.find_item(line).unwrap();
        assert!(l.is_fulfilled() && !l.is_skipped());
        assert_eq!(l.quantity(), Quantity::ONE);
    }

    #[test]
    fn unfulfill_clears_actuals() {
        let (mut t, line) = shopping_with_milk();
        t.cart.fulfill(line, Fulfillment::new(3.0, 2.0)).unwrap();

        assert!(t.cart.unfulfill(line).unwrap());
        assert!(!t.cart.unfulfill(line).unwrap());

        let l = t.cart.find_item(line).unwrap();
        assert!(!l.is_fulfilled() && !l.was_edited_during_shopping());
        assert_eq!(l.actual_price(), None);
    }

    #[test]
    fn skip_then_unskip_restores_planned_quantity() {
        let (mut t, line) = shopping_with_milk();
        assert!(t.cart.skip(line).unwrap());
        assert!(!t.cart.skip(line).unwrap());
        assert!(t.cart.unskip(line).unwrap());
        assert!(!t.cart.unskip(line).unwrap());
        assert_eq!(t.cart.find_item(line).unwrap().quantity().value(), 2.0);
    }

    #[test]
    fn unknown_line_is_not_found() {
        let (mut t, _) = shopping_with_milk();
        let stray = CartItemId::new();
        assert_eq!(t.cart.skip(stray).unwrap_err(), CartError::CartItemNotFound(stray));
        assert_eq!(
            t.cart.set_quantity(stray, 1.0).unwrap_err().code(),
            ErrorCode::CartItemNotFound
        );
    }

    #[test]
    fn cart_round_trips_through_yaml() {
        let (mut t, line) = shopping_with_milk();
        t.cart.fulfill(line, Fulfillment::new(2.75, 2.0)).unwrap();
        t.cart
            .add_ad_hoc_item("Snacks", "StoreA", 20.0, "bag", 1.0, Some("pantry".into()))
            .unwrap();

        let yaml = serde_yaml::to_string(&t.cart).unwrap();
        let restored: Cart = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(restored.id(), t.cart.id());
        assert_eq!(restored.status(), t.cart.status());
        assert_eq!(restored.items(), t.cart.items());
        assert_eq!(restored.started_at(), t.cart.started_at());
    }

    proptest! {
        #[test]
        fn quantity_stays_in_bounds(steps in prop::collection::vec(-50.0f64..200.0, 1..20)) {
            let mut t = trip();
            let line = t.add(t.milk, 1.0, None);
            t.cart.begin_shopping(&t.vault).unwrap();

            for q in steps {
                t.cart.set_quantity(line, q).unwrap();
                let current = t.cart.find_item(line).unwrap().quantity().value();
                prop_assert!((0.0..=Quantity::MAX).contains(&current));
            }
        }

        #[test]
        fn set_quantity_twice_is_a_no_op(q in 0.5f64..100.0) {
            let mut t = trip();
            let line = t.add(t.milk, 1.0, None);
            t.cart.set_quantity(line, q).unwrap();
            let before = t.cart.find_item(line).cloned();
            prop_assert_eq!(t.cart.set_quantity(line, q).unwrap(), QuantityOutcome::Unchanged);
            prop_assert_eq!(t.cart.find_item(line).cloned(), before);
        }

        #[test]
        fn skip_unskip_restores_at_least_one(q in 0.1f64..100.0) {
            let mut t = trip();
            let line = t.add(t.milk, q, None);
            t.cart.begin_shopping(&t.vault).unwrap();
            t.cart.skip(line).unwrap();
            t.cart.unskip(line).unwrap();
            let restored = t.cart.find_item(line).unwrap().quantity().value();
            prop_assert_eq!(restored, q.max(1.0));
        }
    }
}
