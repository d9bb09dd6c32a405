//! Errors returned by application handlers.

use thiserror::Error;

use crate::domain::cart::CartError;
use crate::domain::catalog::CatalogError;
use crate::domain::foundation::{CartId, DomainError, ErrorCode};

/// Failure of a command or query handler.
///
/// Domain rejections keep their typed error so callers can render inline
/// messages; everything raised by ports is `Infrastructure`.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Cart not found: {0}")]
    CartNotFound(CartId),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Infrastructure(#[from] DomainError),
}

impl HandlerError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            HandlerError::CartNotFound(_) => ErrorCode::CartNotFound,
            HandlerError::Cart(err) => err.code(),
            HandlerError::Catalog(err) => err.code(),
            HandlerError::Infrastructure(err) => err.code,
        }
    }

    /// True for failures the user can fix by changing their input.
    pub fn is_validation(&self) -> bool {
        match self {
            HandlerError::Cart(err) => err.is_validation(),
            HandlerError::Catalog(err) => err.is_validation(),
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code().is_not_found()
    }
}

impl From<HandlerError> for DomainError {
    fn from(err: HandlerError) -> Self {
        match err {
            HandlerError::CartNotFound(id) => {
                DomainError::new(ErrorCode::CartNotFound, format!("Cart not found: {}", id))
            }
            HandlerError::Cart(err) => err.into(),
            HandlerError::Catalog(err) => err.into(),
            HandlerError::Infrastructure(err) => err,
        }
    }
}
