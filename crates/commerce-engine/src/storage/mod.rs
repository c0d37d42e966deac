//! # Local Storage Collaborators
//!
//! The engine persists through two narrow traits and never touches a
//! platform API directly:
//!
//! - [`KeyValueStore`]: string values under string keys (cart encoding,
//!   loyalty balances).
//! - [`FavoriteRepository`]: `(user, product)` favorite rows.
//!
//! [`memory`] holds in-process implementations with failure injection for
//! tests; [`file`] keeps key-value data in a JSON file on disk.

pub mod file;
pub mod memory;

pub use file::FileKeyValueStore;
pub use memory::{MemoryFavoriteRepository, MemoryKeyValueStore};

use crate::model::{ProductId, UserId};
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by storage collaborators.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Corrupt(e.to_string())
    }
}

/// Durable string storage scoped to this app.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Durable favorite rows keyed by `(user, product)`.
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn insert(&self, user: &UserId, product: ProductId) -> Result<(), StorageError>;
    async fn delete(&self, user: &UserId, product: ProductId) -> Result<(), StorageError>;
    async fn list_by_user(&self, user: &UserId) -> Result<Vec<ProductId>, StorageError>;
}
