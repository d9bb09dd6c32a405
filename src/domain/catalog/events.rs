//! Catalog domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, CartId, DomainError, EventEnvelope, EventId, ItemId, SerializableDomainEvent,
    Timestamp,
};

/// How an entry reached the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogEntrySource {
    /// Added directly by the user.
    Manual,
    /// Promoted from a shopping-only cart line when a trip completed.
    TripMerge { cart_id: CartId },
}

/// A new item was created in the vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAddedToCatalog {
    pub event_id: EventId,
    pub item_id: ItemId,
    pub name: String,
    pub category: String,
    pub store: String,
    pub price: f64,
    pub unit: String,
    pub source: CatalogEntrySource,
    pub added_at: Timestamp,
}

domain_event!(
    ItemAddedToCatalog,
    event_type = "catalog.item_added.v1",
    schema_version = 1,
    aggregate_id = item_id,
    aggregate_type = "Item",
    occurred_at = added_at,
    event_id = event_id
);

/// An existing item gained a price at another store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceOptionAdded {
    pub event_id: EventId,
    pub item_id: ItemId,
    pub store: String,
    pub price: f64,
    pub unit: String,
    pub source: CatalogEntrySource,
    pub added_at: Timestamp,
}

domain_event!(
    PriceOptionAdded,
    event_type = "catalog.price_option_added.v1",
    schema_version = 1,
    aggregate_id = item_id,
    aggregate_type = "Item",
    occurred_at = added_at,
    event_id = event_id
);

/// The price of an existing store option changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceOptionUpdated {
    pub event_id: EventId,
    pub item_id: ItemId,
    pub store: String,
    pub old_price: f64,
    pub new_price: f64,
    pub updated_at: Timestamp,
}

domain_event!(
    PriceOptionUpdated,
    event_type = "catalog.price_updated.v1",
    schema_version = 1,
    aggregate_id = item_id,
    aggregate_type = "Item",
    occurred_at = updated_at,
    event_id = event_id
);

/// An item was soft-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRemovedFromCatalog {
    pub event_id: EventId,
    pub item_id: ItemId,
    pub name: String,
    pub removed_at: Timestamp,
}

domain_event!(
    ItemRemovedFromCatalog,
    event_type = "catalog.item_removed.v1",
    schema_version = 1,
    aggregate_id = item_id,
    aggregate_type = "Item",
    occurred_at = removed_at,
    event_id = event_id
);

/// Events recorded by the vault, drained with `Vault::take_events`.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    ItemAdded(ItemAddedToCatalog),
    PriceOptionAdded(PriceOptionAdded),
    PriceUpdated(PriceOptionUpdated),
    ItemRemoved(ItemRemovedFromCatalog),
}

impl CatalogEvent {
    /// Wraps the event for transport.
    pub fn to_envelope(&self) -> Result<EventEnvelope, DomainError> {
        match self {
            CatalogEvent::ItemAdded(e) => e.to_envelope(),
            CatalogEvent::PriceOptionAdded(e) => e.to_envelope(),
            CatalogEvent::PriceUpdated(e) => e.to_envelope(),
            CatalogEvent::ItemRemoved(e) => e.to_envelope(),
        }
    }

    /// The item the event is about.
    pub fn item_id(&self) -> ItemId {
        match self {
            CatalogEvent::ItemAdded(e) => e.item_id,
            CatalogEvent::PriceOptionAdded(e) => e.item_id,
            CatalogEvent::PriceUpdated(e) => e.item_id,
            CatalogEvent::ItemRemoved(e) => e.item_id,
        }
    }
}
