//! # Cart Client
//!
//! Cart mutations plus catalog-resolved reads. Totals are recomputed from
//! current catalog prices on every call, so a price edit shows up in the cart
//! immediately.
use super::{typed_error, CatalogClient};
use crate::cart_actor::codec;
use crate::cart_actor::{CartAction, CartError};
use crate::model::{cart_total, resolve_lines, CartLine, Product, ProductId, ResolvedLine};
use async_trait::async_trait;
use commerce_actor::{ActorClient, FrameworkError, ResourceClient};
use rust_decimal::Decimal;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Outcome of rebuilding the cart from its stored encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestoredCart {
    pub restored: usize,
    /// Malformed pairs plus lines whose product is no longer in the catalog.
    pub dropped: usize,
}

#[derive(Clone)]
pub struct CartClient {
    inner: ResourceClient<CartLine>,
    catalog: CatalogClient,
}

fn positive(quantity: i64) -> Result<u32, CartError> {
    match u32::try_from(quantity) {
        Ok(q) if q > 0 => Ok(q),
        _ => Err(CartError::InvalidQuantity(quantity)),
    }
}

impl CartClient {
    pub fn new(inner: ResourceClient<CartLine>, catalog: CatalogClient) -> Self {
        Self { inner, catalog }
    }

    /// Adds `quantity` units of `product`, merging with an existing line.
    ///
    /// Quantities below one are rejected without touching the cart.
    #[instrument(skip(self, product), fields(product = %product.id))]
    pub async fn add(&self, product: &Product, quantity: i64) -> Result<u32, CartError> {
        let quantity = positive(quantity)?;
        if self.catalog.get(product.id).await?.is_none() {
            return Err(CartError::UnknownProduct(product.id));
        }
        let total = self
            .inner
            .perform_action(product.id, CartAction::Add(quantity))
            .await
            .map_err(Self::map_error)?;
        debug!(quantity = total, "Line quantity");
        Ok(total)
    }

    /// Sets a line's quantity. Zero or less removes the line; unknown lines are ignored.
    pub async fn set_quantity(&self, product_id: ProductId, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            return self.remove(product_id).await;
        }
        let quantity = positive(quantity)?;
        match self.inner.update(product_id, quantity).await {
            Ok(_) => Ok(()),
            Err(FrameworkError::NotFound(_)) => {
                debug!(%product_id, "No cart line to update");
                Ok(())
            }
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// Removes a line. Removing an absent line is a no-op.
    pub async fn remove(&self, product_id: ProductId) -> Result<(), CartError> {
        match self.inner.delete(product_id).await {
            Ok(_) | Err(FrameworkError::NotFound(_)) => Ok(()),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// Empties the cart, returning the lines it held.
    pub async fn clear(&self) -> Result<Vec<CartLine>, CartError> {
        self.inner.replace(Vec::new()).await.map_err(Self::map_error)
    }

    /// Lines joined with the catalog; lines for vanished products are left out.
    pub async fn resolved_lines(&self) -> Result<Vec<ResolvedLine>, CartError> {
        let lines = self.list().await?;
        let catalog = self.catalog.list().await?;
        Ok(resolve_lines(&lines, &catalog))
    }

    /// Sum of `price × quantity` at current catalog prices.
    pub async fn total(&self) -> Result<Decimal, CartError> {
        Ok(cart_total(&self.resolved_lines().await?))
    }

    pub async fn is_empty(&self) -> Result<bool, CartError> {
        Ok(self.list().await?.is_empty())
    }

    /// Rebuilds the cart from a stored encoding, keeping only products the
    /// catalog still lists.
    #[instrument(skip(self, raw))]
    pub async fn restore(&self, raw: &str) -> Result<RestoredCart, CartError> {
        let decoded = codec::decode(raw)?;
        let known: HashSet<ProductId> = self.catalog.list().await?.iter().map(|p| p.id).collect();

        let (kept, unknown): (Vec<CartLine>, Vec<CartLine>) = decoded
            .lines
            .into_iter()
            .partition(|line| known.contains(&line.product_id));
        for line in &unknown {
            warn!(product = %line.product_id, "Dropping cart line for product missing from catalog");
        }
        if !decoded.skipped.is_empty() {
            warn!(pairs = ?decoded.skipped, "Dropping malformed cart entries");
        }

        let outcome = RestoredCart {
            restored: kept.len(),
            dropped: unknown.len() + decoded.skipped.len(),
        };
        self.inner.replace(kept).await.map_err(Self::map_error)?;
        info!(restored = outcome.restored, dropped = outcome.dropped, "Cart restored");
        Ok(outcome)
    }
}

#[async_trait]
impl ActorClient<CartLine> for CartClient {
    type Error = CartError;

    fn inner(&self) -> &ResourceClient<CartLine> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        typed_error(e)
    }
}
