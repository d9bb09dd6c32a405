//! Catalog (vault) command and query handlers.

mod add_category;
mod add_item;
mod delete_item;
mod search_items;
mod set_price;

pub use add_category::{AddCategoryCommand, AddCategoryHandler};
pub use add_item::{AddItemCommand, AddItemHandler};
pub use delete_item::{DeleteItemCommand, DeleteItemHandler, DeleteItemResult};
pub use search_items::{ItemMatch, SearchItemsHandler, SearchItemsQuery};
pub use set_price::{
    AddPriceOptionCommand, AddPriceOptionHandler, UpdatePriceCommand, UpdatePriceHandler,
};
