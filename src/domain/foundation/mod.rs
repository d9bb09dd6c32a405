//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, state machine and event
//! infrastructure, and error types that form the vocabulary of the
//! shopping domain.

mod command;
mod errors;
mod events;
mod ids;
mod money;
mod quantity;
mod state_machine;
mod timestamp;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub(crate) use errors::{require_positive, require_text};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{CartId, CartItemId, CategoryId, ItemId};
pub use money::{differs, UnitPrice, BUDGET_TOLERANCE, CHANGE_TOLERANCE};
pub use quantity::Quantity;
pub use state_machine::{InvalidTransition, StateMachine};
pub use timestamp::Timestamp;
