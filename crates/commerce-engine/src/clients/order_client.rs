//! # Order Client
//!
//! Local order log plus the merged history view.
use super::typed_error;
use crate::model::{Order, OrderAck, OrderHistory, OrderRecord, OrderRef, OrderStatus, UserId};
use crate::order_actor::OrderError;
use crate::remote::{with_timeout, CommerceApi};
use async_trait::async_trait;
use commerce_actor::{ActorClient, FrameworkError, ResourceClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<OrderRecord>,
    api: Arc<dyn CommerceApi>,
    timeout: Duration,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<OrderRecord>, api: Arc<dyn CommerceApi>, timeout: Duration) -> Self {
        Self {
            inner,
            api,
            timeout,
        }
    }

    /// Records an attempt as pending and returns its local reference.
    pub async fn record_pending(&self, order: Order) -> Result<OrderRef, OrderError> {
        let reference = self.inner.create(order).await.map_err(Self::map_error)?;
        info!(%reference, "Order pending");
        Ok(reference)
    }

    pub async fn confirm(&self, reference: OrderRef, ack: OrderAck) -> Result<OrderRecord, OrderError> {
        self.transition(reference, OrderStatus::Confirmed(ack)).await
    }

    pub async fn mark_uncertain(
        &self,
        reference: OrderRef,
        reason: impl Into<String>,
    ) -> Result<OrderRecord, OrderError> {
        let reason = reason.into();
        warn!(%reference, %reason, "Order outcome uncertain");
        self.transition(reference, OrderStatus::Uncertain { reason })
            .await
    }

    pub async fn reject(
        &self,
        reference: OrderRef,
        reason: impl Into<String>,
    ) -> Result<OrderRecord, OrderError> {
        self.transition(reference, OrderStatus::Rejected { reason: reason.into() })
            .await
    }

    async fn transition(&self, reference: OrderRef, next: OrderStatus) -> Result<OrderRecord, OrderError> {
        self.inner
            .update(reference, next)
            .await
            .map_err(|e| match e {
                FrameworkError::NotFound(_) => OrderError::NotFound(reference),
                other => Self::map_error(other),
            })
    }

    /// Every local record for `user`, oldest first.
    pub async fn local_orders(&self, user: &UserId) -> Result<Vec<OrderRecord>, OrderError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|r| &r.order.client_id == user)
            .collect())
    }

    /// The service's listing for `user` plus local attempts it has not confirmed.
    #[instrument(skip(self))]
    pub async fn history(&self, user: &UserId) -> Result<OrderHistory, OrderError> {
        let remote = with_timeout(self.timeout, self.api.fetch_orders(user)).await?;
        let unconfirmed = self
            .local_orders(user)
            .await?
            .into_iter()
            .filter(|r| !r.status.is_confirmed())
            .collect();
        Ok(OrderHistory {
            remote,
            unconfirmed,
        })
    }
}

#[async_trait]
impl ActorClient<OrderRecord> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<OrderRecord> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        typed_error(e)
    }
}
