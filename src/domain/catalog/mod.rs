//! Catalog module - the vault of purchasable items.
//!
//! The vault is the root aggregate: it owns categories, which own items,
//! which carry one price option per store.

mod category;
mod errors;
mod events;
mod item;
mod vault;

pub use category::Category;
pub use errors::CatalogError;
pub use events::{
    CatalogEntrySource, CatalogEvent, ItemAddedToCatalog, ItemRemovedFromCatalog,
    PriceOptionAdded, PriceOptionUpdated,
};
pub use item::{Item, PriceOption};
pub(crate) use item::same_key;
pub use vault::{MergeOutcome, NameMatch, Vault};
