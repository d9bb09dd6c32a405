//! Store and category groupings of cart lines.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::domain::cart::{Cart, CartItem, CartItemSource};
use crate::domain::catalog::Vault;

use super::PriceLedger;

/// Label for lines with no known store.
pub const UNASSIGNED_STORE: &str = "Unassigned";

/// Ordering of store groups and of lines inside each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreOrder {
    /// Stores by name; lines in cart order. Used when browsing.
    Alphabetical,
    /// Newest lines first, and stores by their newest line. Used on the
    /// active shopping list.
    MostRecentFirst,
}

/// Lines bought at one store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreGroup<'a> {
    pub store: String,
    pub items: Vec<&'a CartItem>,
}

/// Lines filed under one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    pub category: String,
    pub items: Vec<&'a CartItem>,
}

/// Planned value and spend at one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSubtotal {
    pub store: String,
    pub item_count: usize,
    pub value: f64,
    pub spent: f64,
}

fn store_key(line: &CartItem) -> &str {
    line.store().unwrap_or(UNASSIGNED_STORE)
}

/// Partitions lines by store, matching store names case-insensitively.
///
/// The first spelling seen names the group. The partition is stable:
/// lines keep their relative order unless `order` asks for newest first,
/// in which case later lines win ties on `added_at`.
pub fn group_by_store<'a>(items: &'a [CartItem], order: StoreOrder) -> Vec<StoreGroup<'a>> {
    let mut indexed: Vec<(usize, &'a CartItem)> = items.iter().enumerate().collect();
    if order == StoreOrder::MostRecentFirst {
        indexed.sort_by_key(|(idx, line)| Reverse((line.added_at(), *idx)));
    }

    let mut groups: Vec<StoreGroup<'a>> = Vec::new();
    for (_, line) in indexed {
        let key = store_key(line);
        match groups
            .iter_mut()
            .find(|g| g.store.to_lowercase() == key.to_lowercase())
        {
            Some(group) => group.items.push(line),
            None => groups.push(StoreGroup {
                store: key.to_string(),
                items: vec![line],
            }),
        }
    }

    if order == StoreOrder::Alphabetical {
        groups.sort_by_key(|g| g.store.to_lowercase());
    }
    groups
}

/// Partitions lines by category.
///
/// Catalog lines use their item's category, shopping-only lines the
/// category they were entered with, and anything else `fallback`. Groups
/// follow the vault's category order; categories unknown to the vault
/// come after, by name.
pub fn group_by_category<'a>(
    items: &'a [CartItem],
    vault: &Vault,
    fallback: &str,
) -> Vec<CategoryGroup<'a>> {
    let mut groups: Vec<CategoryGroup<'a>> = Vec::new();
    for line in items {
        let name = match line.source() {
            CartItemSource::Catalog { item_id } => vault.category_name_of(*item_id),
            CartItemSource::AdHoc(payload) => payload.category(),
        }
        .unwrap_or(fallback);

        match groups
            .iter_mut()
            .find(|g| g.category.to_lowercase() == name.to_lowercase())
        {
            Some(group) => group.items.push(line),
            None => groups.push(CategoryGroup {
                category: name.to_string(),
                items: vec![line],
            }),
        }
    }

    let rank = |name: &str| {
        vault
            .find_category_by_name(name)
            .map_or((1, i32::MAX), |c| (0, c.sort_order()))
    };
    groups.sort_by(|a, b| {
        rank(&a.category)
            .cmp(&rank(&b.category))
            .then_with(|| a.category.to_lowercase().cmp(&b.category.to_lowercase()))
    });
    groups
}

/// Value and spend per store, alphabetically.
pub fn store_subtotals(cart: &Cart, vault: &Vault) -> Vec<StoreSubtotal> {
    group_by_store(cart.items(), StoreOrder::Alphabetical)
        .into_iter()
        .map(|group| StoreSubtotal {
            item_count: group.items.len(),
            value: PriceLedger::items_value(group.items.iter().copied(), vault),
            spent: PriceLedger::items_spent(group.items.iter().copied()),
            store: group.store,
        })
        .collect()
}
