//! Vault aggregate - the item catalog root.
//!
//! The vault owns every category and, through them, every item. The one
//! invariant it guards is that a (name, store) pair appears at most once
//! among active items, compared case-insensitively across the whole vault.

use serde::{Deserialize, Serialize};

use crate::domain::cart::AdHocItem;
use crate::domain::foundation::{
    require_text, CartId, CategoryId, EventId, ItemId, Timestamp, UnitPrice,
};

use super::item::same_key;
use super::{
    CatalogEntrySource, CatalogError, CatalogEvent, Category, Item, ItemAddedToCatalog,
    ItemRemovedFromCatalog, PriceOption, PriceOptionAdded, PriceOptionUpdated,
};

/// How `find_items_by_name` compares names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    /// Whole name, case-insensitive.
    Exact,
    /// Case-insensitive substring.
    Contains,
}

/// What merging a shopping-only line did to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A new item was created.
    Created(ItemId),
    /// An item with the same name gained a price at the line's store.
    PriceOptionAdded(ItemId),
    /// The (name, store) pair already existed; its price was refreshed.
    PriceRefreshed(ItemId),
    /// The (name, store) pair already existed at the same price.
    Unchanged(ItemId),
}

impl MergeOutcome {
    pub fn item_id(&self) -> ItemId {
        match self {
            MergeOutcome::Created(id)
            | MergeOutcome::PriceOptionAdded(id)
            | MergeOutcome::PriceRefreshed(id)
            | MergeOutcome::Unchanged(id) => *id,
        }
    }
}

/// The catalog root aggregate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vault {
    categories: Vec<Category>,
    #[serde(skip)]
    domain_events: Vec<CatalogEvent>,
}

impl Vault {
    /// Creates an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    // ───────────────────────────────────────────────────────────────
    // Queries
    // ───────────────────────────────────────────────────────────────

    /// Categories ordered by sort order, then name.
    pub fn categories(&self) -> Vec<&Category> {
        let mut categories: Vec<&Category> = self.categories.iter().collect();
        categories.sort_by(|a, b| {
            a.sort_order()
                .cmp(&b.sort_order())
                .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
        });
        categories
    }

    pub fn find_category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id() == id)
    }

    pub fn find_category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| same_key(c.name(), name))
    }

    /// Every active item in the vault.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.categories.iter().flat_map(|c| c.items())
    }

    pub fn item_count(&self) -> usize {
        self.items().count()
    }

    /// Looks up an active item by id.
    pub fn find_item_by_id(&self, id: ItemId) -> Option<&Item> {
        self.items().find(|i| i.id() == id)
    }

    /// Looks up an item by id, including soft-deleted ones.
    pub fn find_item_including_deleted(&self, id: ItemId) -> Option<&Item> {
        self.categories
            .iter()
            .flat_map(|c| c.all_items())
            .find(|i| i.id() == id)
    }

    /// Active items whose name matches `query`.
    pub fn find_items_by_name(&self, query: &str, mode: NameMatch) -> Vec<&Item> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.items()
            .filter(|item| match mode {
                NameMatch::Exact => item.name().to_lowercase() == needle,
                NameMatch::Contains => item.name().to_lowercase().contains(&needle),
            })
            .collect()
    }

    /// Name of the category holding `item_id`.
    pub fn category_name_of(&self, item_id: ItemId) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.all_items().iter().any(|i| i.id() == item_id))
            .map(|c| c.name())
    }

    /// True if an active item already sells `name` at `store`.
    pub fn contains(&self, name: &str, store: &str) -> bool {
        self.find_by_name_and_store(name, store).is_some()
    }

    fn find_by_name_and_store(&self, name: &str, store: &str) -> Option<&Item> {
        self.items()
            .find(|i| same_key(i.name(), name) && i.offers(store))
    }

    /// Takes accumulated domain events, clearing the internal buffer.
    pub fn take_events(&mut self) -> Vec<CatalogEvent> {
        std::mem::take(&mut self.domain_events)
    }

    // ───────────────────────────────────────────────────────────────
    // Categories
    // ───────────────────────────────────────────────────────────────

    /// Adds a category. Without an explicit sort order it goes last.
    pub fn add_category(
        &mut self,
        name: &str,
        sort_order: Option<i32>,
        color: Option<String>,
    ) -> Result<CategoryId, CatalogError> {
        let name = require_text("category", name)?;
        if self.find_category_by_name(&name).is_some() {
            return Err(CatalogError::DuplicateCategory(name));
        }
        let sort_order = sort_order.unwrap_or_else(|| self.next_sort_order());
        let category = Category::new(name, sort_order, color);
        let id = category.id();
        self.categories.push(category);
        Ok(id)
    }

    fn next_sort_order(&self) -> i32 {
        self.categories
            .iter()
            .map(|c| c.sort_order())
            .max()
            .map_or(0, |max| max + 1)
    }

    fn category_for(&mut self, name: &str) -> Result<usize, CatalogError> {
        let name = require_text("category", name)?;
        if let Some(idx) = self.categories.iter().position(|c| same_key(c.name(), &name)) {
            return Ok(idx);
        }
        self.add_category(&name, None, None)?;
        Ok(self.categories.len() - 1)
    }

    // ───────────────────────────────────────────────────────────────
    // Items
    // ───────────────────────────────────────────────────────────────

    /// Adds `name` at `store` to the catalog.
    ///
    /// Fails with `DuplicateItem` if the pair already exists. If an active
    /// item with the same name exists, the store is attached to it as a new
    /// price option; otherwise a new item is created under `category`
    /// (created on demand).
    pub fn add_item(
        &mut self,
        name: &str,
        category: &str,
        store: &str,
        price: f64,
        unit: &str,
    ) -> Result<ItemId, CatalogError> {
        self.insert_entry(name, category, store, price, unit, CatalogEntrySource::Manual)
            .map(|outcome| outcome.item_id())
    }

    fn insert_entry(
        &mut self,
        name: &str,
        category: &str,
        store: &str,
        price: f64,
        unit: &str,
        source: CatalogEntrySource,
    ) -> Result<MergeOutcome, CatalogError> {
        let name = require_text("name", name)?;
        let store = require_text("store", store)?;
        let price_per_unit = UnitPrice::new(price, unit)?;

        if self.contains(&name, &store) {
            return Err(CatalogError::duplicate_item(name, store));
        }

        let existing = self
            .items()
            .find(|i| same_key(i.name(), &name))
            .map(Item::id);
        if let Some(item_id) = existing {
            self.attach_option(item_id, store, price_per_unit, source)?;
            return Ok(MergeOutcome::PriceOptionAdded(item_id));
        }

        let category_idx = self.category_for(category)?;
        let category = &mut self.categories[category_idx];
        let item = Item::new(
            name,
            category.id(),
            PriceOption::new(store, price_per_unit),
        );
        let item_id = item.id();
        let event = ItemAddedToCatalog {
            event_id: EventId::new(),
            item_id,
            name: item.name().to_string(),
            category: category.name().to_string(),
            store: item.price_options()[0].store().to_string(),
            price: item.price_options()[0].price(),
            unit: item.price_options()[0].unit().to_string(),
            source,
            added_at: item.created_at(),
        };
        category.push_item(item);
        self.domain_events.push(CatalogEvent::ItemAdded(event));

        Ok(MergeOutcome::Created(item_id))
    }

    /// Adds a price at another store to an existing item.
    pub fn add_price_option(
        &mut self,
        item_id: ItemId,
        store: &str,
        price: f64,
        unit: &str,
    ) -> Result<(), CatalogError> {
        let store = require_text("store", store)?;
        let price_per_unit = UnitPrice::new(price, unit)?;
        let item = self.active_item(item_id)?;
        if self.contains(item.name(), &store) {
            return Err(CatalogError::duplicate_item(item.name().to_string(), store));
        }
        self.attach_option(item_id, store, price_per_unit, CatalogEntrySource::Manual)
    }

    fn attach_option(
        &mut self,
        item_id: ItemId,
        store: String,
        price_per_unit: UnitPrice,
        source: CatalogEntrySource,
    ) -> Result<(), CatalogError> {
        let event = PriceOptionAdded {
            event_id: EventId::new(),
            item_id,
            store: store.clone(),
            price: price_per_unit.value(),
            unit: price_per_unit.unit().to_string(),
            source,
            added_at: Timestamp::now(),
        };
        self.active_item_mut(item_id)?
            .push_option(PriceOption::new(store, price_per_unit));
        self.domain_events.push(CatalogEvent::PriceOptionAdded(event));
        Ok(())
    }

    /// Changes the price an item has at `store`. Returns false when the
    /// price was already `price`.
    pub fn update_price(
        &mut self,
        item_id: ItemId,
        store: &str,
        price: f64,
    ) -> Result<bool, CatalogError> {
        let option = self
            .active_item(item_id)?
            .price_at(store)
            .ok_or_else(|| CatalogError::store_not_offered(item_id, store))?;
        let old_price = option.price();
        if (old_price - price).abs() < f64::EPSILON {
            return Ok(false);
        }
        let new_price = UnitPrice::new(price, option.unit())?;

        let option = self
            .active_item_mut(item_id)?
            .price_at_mut(store)
            .ok_or_else(|| CatalogError::store_not_offered(item_id, store))?;
        let store = option.store().to_string();
        option.set_price(new_price);

        self.domain_events
            .push(CatalogEvent::PriceUpdated(PriceOptionUpdated {
                event_id: EventId::new(),
                item_id,
                store,
                old_price,
                new_price: price,
                updated_at: Timestamp::now(),
            }));
        Ok(true)
    }

    /// Replaces the price and unit an item has at `store`.
    fn refresh_option(
        &mut self,
        item_id: ItemId,
        store: &str,
        price_per_unit: UnitPrice,
    ) -> Result<bool, CatalogError> {
        let option = self
            .active_item_mut(item_id)?
            .price_at_mut(store)
            .ok_or_else(|| CatalogError::store_not_offered(item_id, store))?;
        if option.price_per_unit() == &price_per_unit {
            return Ok(false);
        }
        let old_price = option.price();
        let new_price = price_per_unit.value();
        let store = option.store().to_string();
        option.set_price(price_per_unit);

        self.domain_events
            .push(CatalogEvent::PriceUpdated(PriceOptionUpdated {
                event_id: EventId::new(),
                item_id,
                store,
                old_price,
                new_price,
                updated_at: Timestamp::now(),
            }));
        Ok(true)
    }

    /// Soft-deletes an item. Deleting an already deleted item is a no-op.
    ///
    /// Removing the item's lines from carts is the caller's job (see
    /// `Cart::purge_catalog_item`); the vault does not own carts.
    pub fn delete_item(&mut self, item_id: ItemId) -> Result<(), CatalogError> {
        let item = self
            .categories
            .iter_mut()
            .find_map(|c| c.item_mut(item_id))
            .ok_or(CatalogError::ItemNotFound(item_id))?;
        if item.is_deleted() {
            return Ok(());
        }
        item.mark_deleted();
        let name = item.name().to_string();

        self.domain_events
            .push(CatalogEvent::ItemRemoved(ItemRemovedFromCatalog {
                event_id: EventId::new(),
                item_id,
                name,
                removed_at: Timestamp::now(),
            }));
        Ok(())
    }

    /// Promotes a shopping-only cart line into the catalog.
    ///
    /// Uses the line's category, or `category_fallback` when none was
    /// recorded. If the (name, store) pair already exists the stored option
    /// takes the trip's price and unit instead of failing.
    pub fn merge_ad_hoc_into_catalog(
        &mut self,
        ad_hoc: &AdHocItem,
        category_fallback: &str,
        cart_id: CartId,
    ) -> Result<MergeOutcome, CatalogError> {
        let existing = self
            .find_by_name_and_store(ad_hoc.name(), ad_hoc.store())
            .map(Item::id);
        if let Some(item_id) = existing {
            let trip_price = UnitPrice::new(ad_hoc.price(), ad_hoc.unit())?;
            let changed = self.refresh_option(item_id, ad_hoc.store(), trip_price)?;
            return Ok(if changed {
                MergeOutcome::PriceRefreshed(item_id)
            } else {
                MergeOutcome::Unchanged(item_id)
            });
        }

        let category = ad_hoc
            .category()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(category_fallback);
        self.insert_entry(
            ad_hoc.name(),
            category,
            ad_hoc.store(),
            ad_hoc.price(),
            ad_hoc.unit(),
            CatalogEntrySource::TripMerge { cart_id },
        )
    }

    fn active_item(&self, item_id: ItemId) -> Result<&Item, CatalogError> {
        match self.find_item_including_deleted(item_id) {
            Some(item) if item.is_deleted() => Err(CatalogError::ItemDeleted(item_id)),
            Some(item) => Ok(item),
            None => Err(CatalogError::ItemNotFound(item_id)),
        }
    }

    fn active_item_mut(&mut self, item_id: ItemId) -> Result<&mut Item, CatalogError> {
        let item = self
            .categories
            .iter_mut()
            .find_map(|c| c.item_mut(item_id))
            .ok_or(CatalogError::ItemNotFound(item_id))?;
        if item.is_deleted() {
            return Err(CatalogError::ItemDeleted(item_id));
        }
        Ok(item)
    }
}
