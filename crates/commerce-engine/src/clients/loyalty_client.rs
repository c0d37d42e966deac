use super::typed_error;
use crate::loyalty_actor::{points_key, LoyaltyAction, LoyaltyError};
use crate::model::{discount_percent, LoyaltyAccount, UserId};
use crate::storage::KeyValueStore;
use async_trait::async_trait;
use commerce_actor::{ActorClient, FrameworkError, ResourceClient};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Loyalty balances and the discount they unlock.
#[derive(Clone)]
pub struct LoyaltyClient {
    inner: ResourceClient<LoyaltyAccount>,
    kv: Arc<dyn KeyValueStore>,
}

impl LoyaltyClient {
    pub fn new(inner: ResourceClient<LoyaltyAccount>, kv: Arc<dyn KeyValueStore>) -> Self {
        Self { inner, kv }
    }

    /// Awards `hours × 25` points and returns the points awarded.
    #[instrument(skip(self))]
    pub async fn record_activity(&self, user: &UserId, hours: i64) -> Result<u64, LoyaltyError> {
        let hours = match u32::try_from(hours) {
            Ok(h) if h > 0 => h,
            _ => return Err(LoyaltyError::InvalidHours(hours)),
        };
        let awarded = self
            .inner
            .perform_action(user.clone(), LoyaltyAction::RecordActivity { hours })
            .await
            .map_err(Self::map_error)?;
        info!(awarded, "Activity recorded");
        Ok(awarded)
    }

    /// Current balance; users with no activity have zero.
    pub async fn points(&self, user: &UserId) -> Result<u64, LoyaltyError> {
        Ok(self.get(user.clone()).await?.map_or(0, |a| a.points))
    }

    pub async fn discount_percent(&self, user: &UserId) -> Result<Decimal, LoyaltyError> {
        let points = self.points(user).await?;
        Ok(discount_percent(i64::try_from(points).unwrap_or(i64::MAX)))
    }

    /// Loads the stored balance for `user`. A value that is not a number is
    /// logged and treated as zero.
    #[instrument(skip(self))]
    pub async fn restore(&self, user: &UserId) -> Result<u64, LoyaltyError> {
        let points = match self.kv.get(&points_key(user)).await? {
            None => 0,
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|e| {
                warn!(value = %raw, error = %e, "Ignoring unreadable loyalty balance");
                0
            }),
        };
        self.inner
            .upsert(LoyaltyAccount::new(user.clone(), points))
            .await
            .map_err(Self::map_error)?;
        Ok(points)
    }
}

#[async_trait]
impl ActorClient<LoyaltyAccount> for LoyaltyClient {
    type Error = LoyaltyError;

    fn inner(&self) -> &ResourceClient<LoyaltyAccount> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        typed_error(e)
    }
}
