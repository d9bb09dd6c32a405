//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, events, errors)
//! - `catalog` - The vault of items with per-store prices
//! - `cart` - Shopping trip aggregate: lifecycle and line reconciliation
//! - `ledger` - Pure services for totals, budget and groupings

pub mod cart;
pub mod catalog;
pub mod foundation;
pub mod ledger;
