//! # Order Actor
//!
//! Local order history. Every checkout attempt is recorded as
//! [`OrderStatus::Pending`] before the order is submitted, then moved to
//! `Confirmed`, `Rejected` or `Uncertain` once the outcome is known. Uncertain attempts
//! stay visible next to the service's own listing until reconciled.

use crate::model::{Order, OrderRecord, OrderRef, OrderStatus};
use crate::remote::ApiError;
use async_trait::async_trait;
use chrono::Utc;
use commerce_actor::{ActorEntity, ResourceActor, ResourceClient};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(OrderRef),

    #[error("Order {reference} cannot move from {from} to {to}")]
    InvalidTransition {
        reference: OrderRef,
        from: &'static str,
        to: &'static str,
    },

    #[error("Order service error: {0}")]
    Remote(#[from] ApiError),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::ActorCommunicationError(msg)
    }
}

fn status_name(status: &OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "pending",
        OrderStatus::Confirmed(_) => "confirmed",
        OrderStatus::Uncertain { .. } => "uncertain",
        OrderStatus::Rejected { .. } => "rejected",
    }
}

#[async_trait]
impl ActorEntity for OrderRecord {
    type Id = OrderRef;
    type Create = Order;
    type Update = OrderStatus;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = OrderError;

    fn id(&self) -> OrderRef {
        self.reference
    }

    fn from_create_params(reference: OrderRef, order: Order) -> Result<Self, OrderError> {
        Ok(OrderRecord {
            reference,
            order,
            status: OrderStatus::Pending,
            placed_at: Utc::now(),
        })
    }

    /// Pending orders resolve once; uncertain ones may still be confirmed.
    async fn on_update(&mut self, next: OrderStatus, _ctx: &()) -> Result<(), OrderError> {
        let allowed = matches!(
            (&self.status, &next),
            (OrderStatus::Pending, OrderStatus::Confirmed(_))
                | (OrderStatus::Pending, OrderStatus::Uncertain { .. })
                | (OrderStatus::Pending, OrderStatus::Rejected { .. })
                | (OrderStatus::Uncertain { .. }, OrderStatus::Confirmed(_))
        );
        if !allowed {
            return Err(OrderError::InvalidTransition {
                reference: self.reference,
                from: status_name(&self.status),
                to: status_name(&next),
            });
        }
        self.status = next;
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), OrderError> {
        Ok(())
    }
}

/// Creates a new order-history actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<OrderRecord>, ResourceClient<OrderRecord>) {
    ResourceActor::with_id_generator(buffer_size, |max: Option<&OrderRef>| {
        match max {
            Some(r) => r.0.checked_add(1).map(OrderRef),
            None => Some(OrderRef(1)),
        }
    })
}
