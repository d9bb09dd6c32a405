//! Catalog-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ItemId, ValidationError};

/// Errors raised by vault operations.
///
/// Validation failures are returned as values so the caller can render an
/// inline message; `ItemNotFound` indicates a caller bug.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("An item named '{name}' is already sold at '{store}'")]
    DuplicateItem { name: String, store: String },

    #[error("Category '{0}' already exists")]
    DuplicateCategory(String),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Item {0} has been deleted")]
    ItemDeleted(ItemId),

    #[error("Item {item_id} has no price at '{store}'")]
    StoreNotOffered { item_id: ItemId, store: String },
}

impl CatalogError {
    pub fn duplicate_item(name: impl Into<String>, store: impl Into<String>) -> Self {
        CatalogError::DuplicateItem {
            name: name.into(),
            store: store.into(),
        }
    }

    pub fn store_not_offered(item_id: ItemId, store: impl Into<String>) -> Self {
        CatalogError::StoreNotOffered {
            item_id,
            store: store.into(),
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CatalogError::Validation(err) => DomainError::from(err.clone()).code,
            CatalogError::DuplicateItem { .. } => ErrorCode::DuplicateItem,
            CatalogError::DuplicateCategory(_) => ErrorCode::DuplicateCategory,
            CatalogError::ItemNotFound(_) => ErrorCode::ItemNotFound,
            CatalogError::ItemDeleted(_) => ErrorCode::ItemDeleted,
            CatalogError::StoreNotOffered { .. } => ErrorCode::StoreNotOffered,
        }
    }

    /// True for failures the user can fix by changing their input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CatalogError::Validation(_)
                | CatalogError::DuplicateItem { .. }
                | CatalogError::DuplicateCategory(_)
                | CatalogError::StoreNotOffered { .. }
        )
    }
}

impl From<CatalogError> for DomainError {
    fn from(err: CatalogError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_item_message_names_both_keys() {
        let err = CatalogError::duplicate_item("Milk", "StoreA");
        assert_eq!(err.to_string(), "An item named 'Milk' is already sold at 'StoreA'");
        assert_eq!(err.code(), ErrorCode::DuplicateItem);
        assert!(err.is_validation());
    }

    #[test]
    fn validation_code_follows_inner_error() {
        let err = CatalogError::from(ValidationError::empty_field("name"));
        assert_eq!(err.code(), ErrorCode::EmptyField);
    }

    #[test]
    fn not_found_converts_to_domain_error() {
        let id = ItemId::new();
        let err: DomainError = CatalogError::ItemNotFound(id).into();
        assert_eq!(err.code, ErrorCode::ItemNotFound);
        assert!(err.message.contains(&id.to_string()));
    }
}
