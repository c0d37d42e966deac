//! [`ActorEntity`] implementation for [`Product`].
//!
//! The catalog actor generates ids as `max + 1` for locally created products
//! and accepts whole-catalog replacement when a remote listing arrives.

use super::actions::{ProductAction, ProductActionResult};
use super::error::CatalogError;
use crate::model::{Product, ProductDraft, ProductId, ProductUpdate};
use async_trait::async_trait;
use commerce_actor::ActorEntity;

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductDraft;
    type Update = ProductUpdate;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Context = ();
    type Error = CatalogError;

    fn id(&self) -> ProductId {
        self.id
    }

    fn from_create_params(id: ProductId, draft: ProductDraft) -> Result<Self, CatalogError> {
        draft.validate()?;
        Ok(Product::from_draft(id, draft))
    }

    async fn on_update(&mut self, update: ProductUpdate, _ctx: &()) -> Result<(), CatalogError> {
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        self.validate()?;
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: ProductAction,
        _ctx: &(),
    ) -> Result<ProductActionResult, CatalogError> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.stock)),
            ProductAction::DecrementStock(quantity) => {
                self.stock = self.stock_after_sale(quantity);
                Ok(ProductActionResult::DecrementStock(self.clone()))
            }
        }
    }
}
