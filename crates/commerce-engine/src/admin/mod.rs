//! # Inventory Admin
//!
//! Product create, update and delete with optimistic local writes. The
//! catalog changes first so readers see the edit at once; if the product
//! service then fails, the touched entry is put back exactly as it was and the
//! service's error is returned inside [`AdminError::RolledBack`].

pub mod error;

pub use error::AdminError;

use crate::catalog_actor::CatalogError;
use crate::clients::{CartClient, CatalogClient};
use crate::model::{Product, ProductDraft, ProductId};
use crate::remote::{with_timeout, ApiError, CommerceApi};
use commerce_actor::ActorClient;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

fn store_error(e: impl Display) -> AdminError {
    AdminError::Store(e.to_string())
}

#[derive(Clone)]
pub struct InventoryAdmin {
    catalog: CatalogClient,
    cart: CartClient,
    api: Arc<dyn CommerceApi>,
    timeout: Duration,
    low_stock_threshold: u32,
}

impl InventoryAdmin {
    pub fn new(
        catalog: CatalogClient,
        cart: CartClient,
        api: Arc<dyn CommerceApi>,
        timeout: Duration,
        low_stock_threshold: u32,
    ) -> Self {
        Self {
            catalog,
            cart,
            api,
            timeout,
            low_stock_threshold,
        }
    }

    /// Adds a product under a provisional id, then creates it remotely. If the
    /// service assigns a different id the provisional entry is replaced by the
    /// service's copy.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: ProductDraft) -> Result<Product, AdminError> {
        draft.validate()?;
        let local_id = self
            .catalog
            .create_local(draft)
            .await
            .map_err(|e| match e {
                CatalogError::IdsExhausted => AdminError::IdsExhausted,
                other => store_error(other),
            })?;
        let local = self
            .catalog
            .get(local_id)
            .await
            .map_err(store_error)?
            .ok_or(AdminError::NotFound(local_id))?;

        match with_timeout(self.timeout, self.api.create_product(&local)).await {
            Ok(created) => {
                if created.id != local_id {
                    info!(%local_id, remote_id = %created.id, "Service assigned a different id");
                    self.catalog.remove(local_id).await.map_err(store_error)?;
                }
                self.catalog.put(created.clone()).await.map_err(store_error)?;
                info!(id = %created.id, "Product created");
                Ok(created)
            }
            Err(e) => {
                let restored = self.catalog.remove(local_id).await.map(|_| ());
                Err(Self::rolled_back("create", e, restored))
            }
        }
    }

    /// Replaces a product locally, then on the service.
    #[instrument(skip(self, product), fields(id = %product.id))]
    pub async fn update(&self, product: Product) -> Result<Product, AdminError> {
        product.validate()?;
        let before = self.snapshot(product.id).await?;
        self.catalog.put(product.clone()).await.map_err(store_error)?;

        match with_timeout(self.timeout, self.api.update_product(&product)).await {
            Ok(saved) => {
                self.catalog.put(saved.clone()).await.map_err(store_error)?;
                info!(price = %saved.price, stock = saved.stock, "Product updated");
                Ok(saved)
            }
            Err(e) => {
                let restored = self.catalog.put(before).await.map(|_| ());
                Err(Self::rolled_back("update", e, restored))
            }
        }
    }

    /// Removes a product locally, then on the service. Deleting a product that
    /// sits in the cart is allowed but logged.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<(), AdminError> {
        let before = self.snapshot(id).await?;
        match self.cart.get(id).await {
            Ok(Some(line)) => {
                warn!(quantity = line.quantity, "Deleting a product that is in the cart")
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Could not check cart before delete"),
        }
        self.catalog.remove(id).await.map_err(store_error)?;

        match with_timeout(self.timeout, self.api.delete_product(id)).await {
            Ok(()) => {
                info!("Product deleted");
                Ok(())
            }
            Err(e) => {
                let restored = self.catalog.put(before).await.map(|_| ());
                Err(Self::rolled_back("delete", e, restored))
            }
        }
    }

    /// Products below the configured low-stock threshold.
    pub async fn low_stock(&self) -> Result<Vec<Product>, AdminError> {
        self.catalog
            .low_stock(self.low_stock_threshold)
            .await
            .map_err(store_error)
    }

    async fn snapshot(&self, id: ProductId) -> Result<Product, AdminError> {
        self.catalog
            .get(id)
            .await
            .map_err(store_error)?
            .ok_or(AdminError::NotFound(id))
    }

    fn rolled_back<E: Display>(
        operation: &'static str,
        source: ApiError,
        restored: Result<(), E>,
    ) -> AdminError {
        match restored {
            Ok(()) => {
                warn!(operation, error = %source, "Remote write failed; local catalog restored");
                AdminError::RolledBack { operation, source }
            }
            Err(e) => {
                error!(operation, error = %source, rollback = %e, "Remote write failed and rollback failed");
                AdminError::RollbackFailed {
                    operation,
                    source,
                    rollback: e.to_string(),
                }
            }
        }
    }
}
