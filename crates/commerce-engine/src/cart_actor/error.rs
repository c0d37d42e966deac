//! Error types for the cart actor.

use super::codec::CodecError;
use crate::catalog_actor::CatalogError;
use crate::model::ProductId;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    /// Quantities added to a cart must be at least one.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("Quantity overflow for {0}")]
    QuantityOverflow(ProductId),

    #[error("Product not in catalog: {0}")]
    UnknownProduct(ProductId),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Stored cart unreadable: {0}")]
    Codec(#[from] CodecError),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for CartError {
    fn from(msg: String) -> Self {
        CartError::ActorCommunicationError(msg)
    }
}
