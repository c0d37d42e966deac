//! # Favorites Actor
//!
//! One [`FavoriteSet`] per user. Toggling flips membership in memory first
//! and then mirrors the change into the
//! [`FavoriteRepository`](crate::storage::FavoriteRepository); a failed
//! repository write is logged and the in-memory toggle stands.

use crate::model::{FavoriteSet, ProductId, UserId};
use crate::storage::{FavoriteRepository, StorageError};
use async_trait::async_trait;
use commerce_actor::{ActorEntity, ResourceActor, ResourceClient};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FavoritesError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for FavoritesError {
    fn from(msg: String) -> Self {
        FavoritesError::ActorCommunicationError(msg)
    }
}

#[derive(Debug, Clone)]
pub enum FavoriteAction {
    /// Flips membership; the result is whether the product is a favorite afterwards.
    Toggle(ProductId),
}

#[derive(Clone)]
pub struct FavoritesContext {
    pub repo: Arc<dyn FavoriteRepository>,
}

#[async_trait]
impl ActorEntity for FavoriteSet {
    type Id = UserId;
    type Create = ();
    /// Replaces the whole set, used when loading from the repository.
    type Update = BTreeSet<ProductId>;
    type Action = FavoriteAction;
    type ActionResult = bool;
    type Context = FavoritesContext;
    type Error = FavoritesError;

    fn id(&self) -> UserId {
        self.user.clone()
    }

    fn from_create_params(user: UserId, _: ()) -> Result<Self, FavoritesError> {
        Ok(FavoriteSet::empty(user))
    }

    fn vacant(user: &UserId) -> Option<Self> {
        Some(FavoriteSet::empty(user.clone()))
    }

    async fn on_update(
        &mut self,
        products: BTreeSet<ProductId>,
        _ctx: &FavoritesContext,
    ) -> Result<(), FavoritesError> {
        self.products = products;
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: FavoriteAction,
        ctx: &FavoritesContext,
    ) -> Result<bool, FavoritesError> {
        match action {
            FavoriteAction::Toggle(product) => {
                let now_favorite = self.toggle(product);
                let written = if now_favorite {
                    ctx.repo.insert(&self.user, product).await
                } else {
                    ctx.repo.delete(&self.user, product).await
                };
                if let Err(e) = written {
                    warn!(user = %self.user, %product, now_favorite, error = %e,
                        "Favorite not persisted; keeping in-memory state");
                }
                Ok(now_favorite)
            }
        }
    }
}

/// Creates a new favorites actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<FavoriteSet>, ResourceClient<FavoriteSet>) {
    ResourceActor::new(buffer_size)
}
