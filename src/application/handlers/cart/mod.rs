//! Cart command and query handlers.

mod add_ad_hoc_item;
mod add_catalog_item;
mod adjust_quantity;
mod begin_shopping;
mod complete_shopping;
mod create_cart;
mod delete_cart;
mod get_cart_summary;
mod list_carts;
mod record_purchase;
mod remove_cart_item;
mod reopen_cart;
mod return_to_planning;
mod update_cart_details;

pub use add_ad_hoc_item::{AddAdHocItemCommand, AddAdHocItemHandler, AddAdHocItemResult};
pub use add_catalog_item::{AddCatalogItemCommand, AddCatalogItemHandler, AddCatalogItemResult};
pub use adjust_quantity::{
    AdjustQuantityCommand, AdjustQuantityHandler, AdjustQuantityResult, QuantityAdjustment,
};
pub use begin_shopping::{BeginShoppingCommand, BeginShoppingHandler};
pub use complete_shopping::{
    CompleteShoppingCommand, CompleteShoppingHandler, CompleteShoppingResult,
};
pub use create_cart::{CreateCartCommand, CreateCartHandler, CreateCartResult};
pub use delete_cart::{DeleteCartCommand, DeleteCartHandler};
pub use get_cart_summary::{GetCartSummaryHandler, GetCartSummaryQuery};
pub use list_carts::{ListCartsHandler, ListCartsQuery};
pub use record_purchase::{
    PurchaseAction, RecordPurchaseCommand, RecordPurchaseHandler, RecordPurchaseResult,
};
pub use remove_cart_item::{RemoveCartItemCommand, RemoveCartItemHandler};
pub use reopen_cart::{ReopenCartCommand, ReopenCartHandler};
pub use return_to_planning::{ReturnToPlanningCommand, ReturnToPlanningHandler};
pub use update_cart_details::{UpdateCartDetailsCommand, UpdateCartDetailsHandler};
