//! Cart-specific error types.

use thiserror::Error;

use crate::domain::catalog::CatalogError;
use crate::domain::foundation::{
    CartItemId, DomainError, ErrorCode, InvalidTransition, ValidationError,
};

use super::CartStatus;

/// Errors raised by cart operations.
///
/// Validation failures come back as values so the caller can show them
/// inline. `CartItemNotFound` means the caller holds a stale id. Phase
/// errors mean the operation does not apply to the cart right now.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CartError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Cart item not found: {0}")]
    CartItemNotFound(CartItemId),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error("Cannot {operation} while the cart is {status}")]
    InvalidPhase {
        operation: &'static str,
        status: CartStatus,
    },
}

impl CartError {
    pub fn invalid_phase(operation: &'static str, status: CartStatus) -> Self {
        CartError::InvalidPhase { operation, status }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CartError::Validation(err) => DomainError::from(err.clone()).code,
            CartError::Catalog(err) => err.code(),
            CartError::CartItemNotFound(_) => ErrorCode::CartItemNotFound,
            CartError::InvalidTransition(_) => ErrorCode::InvalidStateTransition,
            CartError::InvalidPhase { .. } => ErrorCode::InvalidCartPhase,
        }
    }

    /// True when the cart's phase rejected the operation.
    pub fn is_state_error(&self) -> bool {
        self.code().is_state_error()
    }

    /// True for failures the user can fix by changing their input.
    pub fn is_validation(&self) -> bool {
        match self {
            CartError::Validation(_) => true,
            CartError::Catalog(err) => err.is_validation(),
            _ => false,
        }
    }
}

impl From<CartError> for DomainError {
    fn from(err: CartError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
