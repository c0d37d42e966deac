//! # Catalog Client
//!
//! Loads the catalog from the product service, falling back to the bundled
//! catalog, and answers stock, search and low-stock queries.
use super::typed_error;
use crate::catalog_actor::{
    fallback_catalog, CatalogError, LoadError, ProductAction, ProductActionResult,
};
use crate::model::{Category, Product, ProductDraft, ProductId, ProductUpdate};
use crate::remote::{with_timeout, CommerceApi};
use async_trait::async_trait;
use commerce_actor::{ActorClient, FrameworkError, ResourceClient};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Where the current catalog came from.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    Remote,
    /// The bundled catalog, with the reason the remote one was not used.
    Fallback(LoadError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogLoad {
    pub products: Vec<Product>,
    pub source: CatalogSource,
}

#[derive(Clone)]
pub struct CatalogClient {
    inner: ResourceClient<Product>,
    api: Arc<dyn CommerceApi>,
    timeout: Duration,
}

impl CatalogClient {
    pub fn new(inner: ResourceClient<Product>, api: Arc<dyn CommerceApi>, timeout: Duration) -> Self {
        Self {
            inner,
            api,
            timeout,
        }
    }

    /// Replaces the catalog with the product service's listing, or with the
    /// bundled catalog if the service fails, times out or lists nothing.
    ///
    /// Remote failures never surface as errors; they are reported in the
    /// returned [`CatalogSource`]. Only a failure of the local store is an error.
    #[instrument(skip(self))]
    pub async fn load_detailed(&self) -> Result<CatalogLoad, LoadError> {
        let (products, source) = match with_timeout(self.timeout, self.api.fetch_products()).await {
            Ok(products) if !products.is_empty() => (products, CatalogSource::Remote),
            Ok(_) => {
                warn!("Product service returned an empty catalog; using bundled catalog");
                (fallback_catalog(), CatalogSource::Fallback(LoadError::Empty))
            }
            Err(e) => {
                warn!(error = %e, "Product service unavailable; using bundled catalog");
                (fallback_catalog(), CatalogSource::Fallback(LoadError::Remote(e)))
            }
        };

        self.inner
            .replace(products)
            .await
            .map_err(Self::map_error)?;
        let products = self.list().await?;
        info!(count = products.len(), remote = matches!(source, CatalogSource::Remote), "Catalog loaded");
        Ok(CatalogLoad { products, source })
    }

    /// [`load_detailed`](Self::load_detailed) without the source.
    pub async fn load(&self) -> Result<Vec<Product>, LoadError> {
        Ok(self.load_detailed().await?.products)
    }

    /// Loads the catalog unless `token` is cancelled first.
    ///
    /// Cancelling only stops the wait: the load keeps running and still
    /// replaces the catalog when it finishes.
    pub async fn load_until_cancelled(&self, token: &CancellationToken) -> Result<CatalogLoad, LoadError> {
        let this = self.clone();
        let task = tokio::spawn(async move { this.load_detailed().await });
        tokio::select! {
            _ = token.cancelled() => {
                debug!("Catalog load abandoned; it will finish in the background");
                Err(LoadError::Cancelled)
            }
            joined = task => joined
                .map_err(|e| LoadError::Store(CatalogError::ActorCommunicationError(e.to_string())))?,
        }
    }

    /// Products in `category` (all categories if `None`) whose name contains `query`.
    pub async fn search(&self, category: Option<&Category>, query: &str) -> Result<Vec<Product>, CatalogError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|p| category.map_or(true, |c| &p.category == c))
            .filter(|p| p.matches_query(query))
            .collect())
    }

    /// Products with fewer than `threshold` units in stock.
    pub async fn low_stock(&self, threshold: u32) -> Result<Vec<Product>, CatalogError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|p| p.is_low_stock(threshold))
            .collect())
    }

    pub async fn check_stock(&self, id: ProductId) -> Result<u32, CatalogError> {
        match self
            .inner
            .perform_action(id, ProductAction::CheckStock)
            .await
            .map_err(Self::map_error)?
        {
            ProductActionResult::CheckStock(stock) => Ok(stock),
            other => Err(CatalogError::UnexpectedResult(format!("{other:?}"))),
        }
    }

    /// Records a sale; stock is floored at zero. Returns the updated product.
    #[instrument(skip(self))]
    pub async fn decrement_stock(&self, id: ProductId, quantity: u32) -> Result<Product, CatalogError> {
        match self
            .inner
            .perform_action(id, ProductAction::DecrementStock(quantity))
            .await
            .map_err(Self::map_error)?
        {
            ProductActionResult::DecrementStock(product) => Ok(product),
            other => Err(CatalogError::UnexpectedResult(format!("{other:?}"))),
        }
    }

    pub async fn update_product(&self, id: ProductId, update: ProductUpdate) -> Result<Product, CatalogError> {
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Adds a product under the next local id (`max + 1`).
    pub async fn create_local(&self, draft: ProductDraft) -> Result<ProductId, CatalogError> {
        self.inner.create(draft).await.map_err(Self::map_error)
    }

    /// Stores `product` under its id, returning the entry it replaced.
    pub async fn put(&self, product: Product) -> Result<Option<Product>, CatalogError> {
        product.validate()?;
        self.inner.upsert(product).await.map_err(Self::map_error)
    }

    /// Removes a product, returning it if it was present.
    pub async fn remove(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        match self.inner.delete(id).await {
            Ok(product) => Ok(Some(product)),
            Err(FrameworkError::NotFound(_)) => Ok(None),
            Err(e) => Err(Self::map_error(e)),
        }
    }
}

#[async_trait]
impl ActorClient<Product> for CatalogClient {
    type Error = CatalogError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => CatalogError::NotFound(id),
            FrameworkError::IdsExhausted => CatalogError::IdsExhausted,
            other => typed_error(other),
        }
    }
}
