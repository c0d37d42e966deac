use super::{typed_error, CatalogClient};
use crate::favorites_actor::{FavoriteAction, FavoritesError};
use crate::model::{FavoriteSet, Product, ProductId, UserId};
use crate::storage::FavoriteRepository;
use async_trait::async_trait;
use commerce_actor::{ActorClient, FrameworkError, ResourceClient};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Per-user favorites, mirrored into a [`FavoriteRepository`].
#[derive(Clone)]
pub struct FavoritesClient {
    inner: ResourceClient<FavoriteSet>,
    catalog: CatalogClient,
    repo: Arc<dyn FavoriteRepository>,
}

impl FavoritesClient {
    pub fn new(
        inner: ResourceClient<FavoriteSet>,
        catalog: CatalogClient,
        repo: Arc<dyn FavoriteRepository>,
    ) -> Self {
        Self {
            inner,
            catalog,
            repo,
        }
    }

    /// Reads the user's rows from the repository into the local set.
    #[instrument(skip(self))]
    pub async fn load(&self, user: &UserId) -> Result<usize, FavoritesError> {
        let products: BTreeSet<ProductId> =
            self.repo.list_by_user(user).await?.into_iter().collect();
        let count = products.len();
        let set = FavoriteSet {
            user: user.clone(),
            products,
        };
        self.inner.upsert(set).await.map_err(Self::map_error)?;
        info!(count, "Favorites loaded");
        Ok(count)
    }

    /// Flips `product` for `user` and returns whether it is a favorite afterwards.
    pub async fn toggle(&self, user: &UserId, product: ProductId) -> Result<bool, FavoritesError> {
        let now_favorite = self
            .inner
            .perform_action(user.clone(), FavoriteAction::Toggle(product))
            .await
            .map_err(Self::map_error)?;
        debug!(%user, %product, now_favorite, "Favorite toggled");
        Ok(now_favorite)
    }

    pub async fn is_favorite(&self, user: &UserId, product: ProductId) -> Result<bool, FavoritesError> {
        Ok(self
            .get(user.clone())
            .await?
            .is_some_and(|set| set.contains(product)))
    }

    /// Favorite products resolved against the catalog. Ids the catalog no
    /// longer lists are left out.
    pub async fn favorites(&self, user: &UserId) -> Result<Vec<Product>, FavoritesError> {
        let Some(set) = self.get(user.clone()).await? else {
            return Ok(Vec::new());
        };
        let catalog = self
            .catalog
            .list()
            .await
            .map_err(|e| FavoritesError::Catalog(e.to_string()))?;
        Ok(catalog
            .into_iter()
            .filter(|p| set.contains(p.id))
            .collect())
    }

    /// Drops the local reflection of a user's favorites. Repository rows stay.
    pub async fn forget(&self, user: &UserId) -> Result<(), FavoritesError> {
        match self.inner.delete(user.clone()).await {
            Ok(_) | Err(FrameworkError::NotFound(_)) => Ok(()),
            Err(e) => Err(Self::map_error(e)),
        }
    }
}

#[async_trait]
impl ActorClient<FavoriteSet> for FavoritesClient {
    type Error = FavoritesError;

    fn inner(&self) -> &ResourceClient<FavoriteSet> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        typed_error(e)
    }
}
