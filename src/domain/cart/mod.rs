//! Cart module - shopping trips and their lines.
//!
//! A cart moves `Planning → Shopping → Completed` (with the reverse edges
//! `Shopping → Planning` and `Completed → Shopping`). Lines record what was
//! planned and what was actually bought so the ledger can report on both.

mod aggregate;
mod cart_item;
mod errors;
mod events;
mod status;

pub use aggregate::{Cart, CompletionReport, MergedLine, QuantityOutcome};
pub use cart_item::{AdHocItem, CartItem, CartItemSource, Fulfillment};
pub use errors::CartError;
pub use events::{
    CartCreated, CartDeleted, CartDetailsChanged, CartEvent, CartItemChange, CartItemChanged,
    CartPhaseChanged,
};
pub use status::CartStatus;
