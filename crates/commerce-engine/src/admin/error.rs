//! Error types for inventory administration.

use crate::model::{InvalidProduct, ProductId};
use crate::remote::ApiError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AdminError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    #[error("Invalid product: {0}")]
    Invalid(#[from] InvalidProduct),

    /// The product service refused or missed the write; the local catalog is
    /// back to what it was before the call.
    #[error("{operation} rolled back: {source}")]
    RolledBack {
        operation: &'static str,
        #[source]
        source: ApiError,
    },

    /// The remote write failed and the local catalog could not be restored either.
    #[error("{operation} failed ({source}) and rollback failed: {rollback}")]
    RollbackFailed {
        operation: &'static str,
        source: ApiError,
        rollback: String,
    },

    #[error("No product ids left for a new product")]
    IdsExhausted,

    #[error("Store error: {0}")]
    Store(String),
}

impl From<String> for AdminError {
    fn from(msg: String) -> Self {
        AdminError::Store(msg)
    }
}
