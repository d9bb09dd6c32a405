//! Categories group catalog items for browsing and merge-back.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CategoryId, ItemId};

use super::Item;

/// A named grouping of catalog items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: String,
    sort_order: i32,
    /// Overrides the generated color in the presentation layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    items: Vec<Item>,
}

impl Category {
    pub(crate) fn new(name: String, sort_order: i32, color: Option<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name,
            sort_order,
            color,
            items: Vec::new(),
        }
    }

    pub fn id(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sort_order(&self) -> i32 {
        self.sort_order
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// All items, including soft-deleted ones.
    pub fn all_items(&self) -> &[Item] {
        &self.items
    }

    /// Items that have not been deleted.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| !i.is_deleted())
    }

    pub(crate) fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id() == id)
    }

    pub(crate) fn push_item(&mut self, item: Item) {
        self.items.push(item);
    }
}
