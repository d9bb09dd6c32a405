//! Cart domain events.
//!
//! Events published as a trip moves through its phases:
//! - `CartCreated` - new cart in planning
//! - `CartDetailsChanged` - name or budget edited
//! - `CartPhaseChanged` - any lifecycle transition
//! - `CartItemChanged` - a line was added, requantified, fulfilled, skipped...
//! - `CartDeleted` - cart removed entirely

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, CartId, CartItemId, DomainError, EventEnvelope, EventId,
    SerializableDomainEvent, Timestamp,
};

use super::CartStatus;

// ════════════════════════════════════════════════════════════════════════════
// CartCreated
// ════════════════════════════════════════════════════════════════════════════

/// Published when a new cart is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartCreated {
    pub event_id: EventId,
    pub cart_id: CartId,
    pub name: String,
    pub budget: f64,
    pub created_at: Timestamp,
}

domain_event!(
    CartCreated,
    event_type = "cart.created.v1",
    schema_version = 1,
    aggregate_id = cart_id,
    aggregate_type = "Cart",
    occurred_at = created_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// CartDetailsChanged
// ════════════════════════════════════════════════════════════════════════════

/// Published when a cart is renamed or its budget changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartDetailsChanged {
    pub event_id: EventId,
    pub cart_id: CartId,
    pub name: String,
    pub budget: f64,
    pub changed_at: Timestamp,
}

domain_event!(
    CartDetailsChanged,
    event_type = "cart.details_changed.v1",
    schema_version = 1,
    aggregate_id = cart_id,
    aggregate_type = "Cart",
    occurred_at = changed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// CartPhaseChanged
// ════════════════════════════════════════════════════════════════════════════

/// Published on every lifecycle transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartPhaseChanged {
    pub event_id: EventId,
    pub cart_id: CartId,
    pub from: CartStatus,
    pub to: CartStatus,
    pub changed_at: Timestamp,
}

domain_event!(
    CartPhaseChanged,
    event_type = "cart.phase_changed.v1",
    schema_version = 1,
    aggregate_id = cart_id,
    aggregate_type = "Cart",
    occurred_at = changed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// CartItemChanged
// ════════════════════════════════════════════════════════════════════════════

/// What happened to a cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartItemChange {
    Added { quantity: f64 },
    QuantityChanged { from: f64, to: f64 },
    Removed,
    Fulfilled { price: f64, quantity: f64 },
    Unfulfilled,
    Skipped,
    Unskipped { quantity: f64 },
    /// A skipped or emptied shopping-only line was brought back.
    Reactivated { quantity: f64 },
}

/// Published whenever a single line changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItemChanged {
    pub event_id: EventId,
    pub cart_id: CartId,
    pub cart_item_id: CartItemId,
    pub change: CartItemChange,
    pub changed_at: Timestamp,
}

domain_event!(
    CartItemChanged,
    event_type = "cart.item_changed.v1",
    schema_version = 1,
    aggregate_id = cart_id,
    aggregate_type = "Cart",
    occurred_at = changed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// CartDeleted
// ════════════════════════════════════════════════════════════════════════════

/// Published when a cart is removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartDeleted {
    pub event_id: EventId,
    pub cart_id: CartId,
    pub name: String,
    pub deleted_at: Timestamp,
}

domain_event!(
    CartDeleted,
    event_type = "cart.deleted.v1",
    schema_version = 1,
    aggregate_id = cart_id,
    aggregate_type = "Cart",
    occurred_at = deleted_at,
    event_id = event_id
);

/// Events recorded by a cart, drained with `Cart::take_events`.
#[derive(Debug, Clone, PartialEq)]
pub enum CartEvent {
    Created(CartCreated),
    DetailsChanged(CartDetailsChanged),
    PhaseChanged(CartPhaseChanged),
    ItemChanged(CartItemChanged),
    Deleted(CartDeleted),
}

impl CartEvent {
    pub(crate) fn item_changed(cart_id: CartId, cart_item_id: CartItemId, change: CartItemChange) -> Self {
        CartEvent::ItemChanged(CartItemChanged {
            event_id: EventId::new(),
            cart_id,
            cart_item_id,
            change,
            changed_at: Timestamp::now(),
        })
    }

    /// Wraps the event for transport.
    pub fn to_envelope(&self) -> Result<EventEnvelope, DomainError> {
        match self {
            CartEvent::Created(e) => e.to_envelope(),
            CartEvent::DetailsChanged(e) => e.to_envelope(),
            CartEvent::PhaseChanged(e) => e.to_envelope(),
            CartEvent::ItemChanged(e) => e.to_envelope(),
            CartEvent::Deleted(e) => e.to_envelope(),
        }
    }

    pub fn cart_id(&self) -> CartId {
        match self {
            CartEvent::Created(e) => e.cart_id,
            CartEvent::DetailsChanged(e) => e.cart_id,
            CartEvent::PhaseChanged(e) => e.cart_id,
            CartEvent::ItemChanged(e) => e.cart_id,
            CartEvent::Deleted(e) => e.cart_id,
        }
    }
}
