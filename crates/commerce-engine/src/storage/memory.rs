//! In-process storage with switchable failures.

use super::{FavoriteRepository, KeyValueStore, StorageError};
use crate::model::{ProductId, UserId};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Key-value store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `set` fail until switched off.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Reads a value without going through the async trait.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.peek(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("write to {key} refused")));
        }
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Favorite rows in a set, so inserts are idempotent.
#[derive(Debug, Default)]
pub struct MemoryFavoriteRepository {
    rows: Mutex<BTreeSet<(UserId, ProductId)>>,
    fail_writes: AtomicBool,
}

impl MemoryFavoriteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn exists(&self, user: &UserId, product: ProductId) -> bool {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(user.clone(), product))
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("favorites repository is read-only".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl FavoriteRepository for MemoryFavoriteRepository {
    async fn insert(&self, user: &UserId, product: ProductId) -> Result<(), StorageError> {
        self.check_writable()?;
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((user.clone(), product));
        Ok(())
    }

    async fn delete(&self, user: &UserId, product: ProductId) -> Result<(), StorageError> {
        self.check_writable()?;
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(user.clone(), product));
        Ok(())
    }

    async fn list_by_user(&self, user: &UserId) -> Result<Vec<ProductId>, StorageError> {
        Ok(self
            .rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(owner, _)| owner == user)
            .map(|(_, product)| *product)
            .collect())
    }
}
