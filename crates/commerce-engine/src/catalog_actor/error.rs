//! Error types for the catalog actor.

use crate::model::InvalidProduct;
use thiserror::Error;

/// Errors that can occur during catalog operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Invalid product: {0}")]
    Invalid(#[from] InvalidProduct),

    /// Every local id up to `u64::MAX` is taken.
    #[error("No product ids left to allocate")]
    IdsExhausted,

    #[error("Unexpected action result: {0}")]
    UnexpectedResult(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for CatalogError {
    fn from(msg: String) -> Self {
        CatalogError::ActorCommunicationError(msg)
    }
}

/// Why a catalog load did not use the product service's listing.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LoadError {
    #[error("Product service failed: {0}")]
    Remote(#[from] crate::remote::ApiError),

    /// The service answered with no products at all.
    #[error("Product service returned an empty catalog")]
    Empty,

    /// The caller stopped waiting; the load still completes in the background.
    #[error("Catalog load abandoned by caller")]
    Cancelled,

    #[error("Catalog store failed: {0}")]
    Store(#[from] CatalogError),
}
