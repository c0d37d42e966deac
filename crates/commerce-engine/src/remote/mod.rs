//! # Remote Commerce API
//!
//! The engine talks to the product and order services through the
//! [`CommerceApi`] trait. [`http::HttpCommerceApi`] speaks JSON over HTTP;
//! [`memory::InMemoryCommerceApi`] keeps everything in process and can be told
//! to fail, which is what the tests and the offline demo use.
//!
//! Wire shapes live in [`wire`] and are converted explicitly into the model
//! types, so nothing outside this module depends on field spellings.

pub mod http;
pub mod memory;
pub mod wire;

pub use http::HttpCommerceApi;
pub use memory::InMemoryCommerceApi;

use crate::model::{Order, OrderAck, Product, ProductId, RemoteOrder, UserId};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors reported by a remote commerce service.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The request never completed: connection refused, reset, DNS failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// No answer arrived within the configured deadline.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The service answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// The service answered, but not with anything we can read.
    #[error("Could not decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether the service may have acted on the request despite the error.
    ///
    /// Only a well-formed rejection proves it did not.
    pub fn outcome_uncertain(&self) -> bool {
        !matches!(self, ApiError::Status { status, .. } if (400..500).contains(status))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// Runs a remote call under a deadline.
pub async fn with_timeout<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| ApiError::Timeout(limit))?
}

/// Product and order services the engine depends on.
#[async_trait]
pub trait CommerceApi: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<Product>, ApiError>;

    /// Submits an order and returns the service's acknowledgement.
    async fn submit_order(&self, order: &Order) -> Result<OrderAck, ApiError>;

    async fn fetch_orders(&self, client: &UserId) -> Result<Vec<RemoteOrder>, ApiError>;

    /// Creates a product; the returned copy carries the service-assigned id.
    async fn create_product(&self, product: &Product) -> Result<Product, ApiError>;

    async fn update_product(&self, product: &Product) -> Result<Product, ApiError>;

    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError>;
}
