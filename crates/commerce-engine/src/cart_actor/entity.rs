//! [`ActorEntity`] implementation for [`CartLine`].
//!
//! Lines are keyed by product, so adding a product twice increments one
//! line. A line whose quantity reaches zero is vacant and leaves the store.
//! Every committed change rewrites the persisted cart encoding.

use super::codec;
use super::error::CartError;
use crate::model::{CartLine, ProductId};
use crate::storage::KeyValueStore;
use async_trait::async_trait;
use commerce_actor::ActorEntity;
use std::sync::Arc;
use tracing::{debug, warn};

/// Operations on a cart line beyond CRUD.
#[derive(Debug, Clone)]
pub enum CartAction {
    /// Adds units, creating the line if needed. Returns the new quantity.
    Add(u32),
}

/// Where the cart actor persists its encoding.
#[derive(Clone)]
pub struct CartContext {
    pub kv: Arc<dyn KeyValueStore>,
    pub key: String,
}

impl CartContext {
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }
}

#[async_trait]
impl ActorEntity for CartLine {
    type Id = ProductId;
    type Create = u32;
    type Update = u32;
    type Action = CartAction;
    type ActionResult = u32;
    type Context = CartContext;
    type Error = CartError;

    fn id(&self) -> ProductId {
        self.product_id
    }

    fn from_create_params(product_id: ProductId, quantity: u32) -> Result<Self, CartError> {
        Ok(CartLine::new(product_id, quantity))
    }

    fn vacant(id: &ProductId) -> Option<Self> {
        Some(CartLine::new(*id, 0))
    }

    fn is_vacant(&self) -> bool {
        self.quantity == 0
    }

    async fn on_update(&mut self, quantity: u32, _ctx: &CartContext) -> Result<(), CartError> {
        self.quantity = quantity;
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: CartAction,
        _ctx: &CartContext,
    ) -> Result<u32, CartError> {
        match action {
            CartAction::Add(quantity) => {
                self.quantity = self
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CartError::QuantityOverflow(self.product_id))?;
                Ok(self.quantity)
            }
        }
    }

    async fn on_store_changed(lines: &[Self], ctx: &CartContext) {
        let encoded = codec::encode(lines);
        match ctx.kv.set(&ctx.key, &encoded).await {
            Ok(()) => debug!(key = %ctx.key, lines = lines.len(), "Cart persisted"),
            Err(e) => warn!(key = %ctx.key, error = %e, "Cart persistence failed; keeping in-memory cart"),
        }
    }
}
