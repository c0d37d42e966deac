//! # Loyalty Actor
//!
//! Points balances per user. Recording `h` hours of activity awards
//! `h × 25` points; balances are written to the key-value store under
//! [`points_key`] after every change and read back by
//! [`LoyaltyClient::restore`](crate::clients::LoyaltyClient::restore).

use crate::model::{LoyaltyAccount, UserId, POINTS_PER_HOUR};
use crate::storage::{KeyValueStore, StorageError};
use async_trait::async_trait;
use commerce_actor::{ActorEntity, ResourceActor, ResourceClient};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LoyaltyError {
    /// Activity must be a positive number of hours.
    #[error("Invalid hours: {0}")]
    InvalidHours(i64),

    #[error("Points overflow for {0}")]
    Overflow(UserId),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for LoyaltyError {
    fn from(msg: String) -> Self {
        LoyaltyError::ActorCommunicationError(msg)
    }
}

#[derive(Debug, Clone)]
pub enum LoyaltyAction {
    /// Awards points for `hours` of activity and returns the points awarded.
    RecordActivity { hours: u32 },
}

#[derive(Clone)]
pub struct LoyaltyContext {
    pub kv: Arc<dyn KeyValueStore>,
}

/// Storage key holding a user's points balance.
pub fn points_key(user: &UserId) -> String {
    format!("loyalty.points.{user}")
}

#[async_trait]
impl ActorEntity for LoyaltyAccount {
    type Id = UserId;
    type Create = u64;
    /// Sets the balance outright, used when restoring from storage.
    type Update = u64;
    type Action = LoyaltyAction;
    type ActionResult = u64;
    type Context = LoyaltyContext;
    type Error = LoyaltyError;

    fn id(&self) -> UserId {
        self.user.clone()
    }

    fn from_create_params(user: UserId, points: u64) -> Result<Self, LoyaltyError> {
        Ok(LoyaltyAccount::new(user, points))
    }

    fn vacant(user: &UserId) -> Option<Self> {
        Some(LoyaltyAccount::new(user.clone(), 0))
    }

    async fn on_update(&mut self, points: u64, _ctx: &LoyaltyContext) -> Result<(), LoyaltyError> {
        self.points = points;
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: LoyaltyAction,
        _ctx: &LoyaltyContext,
    ) -> Result<u64, LoyaltyError> {
        match action {
            LoyaltyAction::RecordActivity { hours } => {
                if hours == 0 {
                    return Err(LoyaltyError::InvalidHours(0));
                }
                let awarded = u64::from(hours) * POINTS_PER_HOUR;
                self.points = self
                    .points
                    .checked_add(awarded)
                    .ok_or_else(|| LoyaltyError::Overflow(self.user.clone()))?;
                Ok(awarded)
            }
        }
    }

    async fn on_store_changed(accounts: &[Self], ctx: &LoyaltyContext) {
        for account in accounts {
            let key = points_key(&account.user);
            if let Err(e) = ctx.kv.set(&key, &account.points.to_string()).await {
                warn!(user = %account.user, error = %e, "Loyalty balance not persisted");
            }
        }
    }
}

/// Creates a new loyalty actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<LoyaltyAccount>, ResourceClient<LoyaltyAccount>) {
    ResourceActor::new(buffer_size)
}
