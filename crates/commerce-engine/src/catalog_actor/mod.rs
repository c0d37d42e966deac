//! # Catalog Actor
//!
//! Owns the product catalog: the authoritative list of products, prices and
//! stock the rest of the engine reads from.
//!
//! ## Structure
//!
//! - [`entity`]: [`ActorEntity`](commerce_actor::ActorEntity) implementation for [`Product`]
//! - [`error`]: [`CatalogError`]
//! - [`actions`]: [`ProductAction`] and [`ProductActionResult`] for stock reads and sales
//! - [`fallback`]: the bundled catalog used when the product service is unreachable
//! - [`new()`]: factory returning the actor and its client
//!
//! ## Usage
//!
//! ```rust
//! use commerce_engine::catalog_actor::{self, ProductAction, ProductActionResult};
//! use commerce_engine::model::ProductId;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = catalog_actor::new(32);
//!     tokio::spawn(actor.run(()));
//!
//!     client.replace(catalog_actor::fallback_catalog()).await.unwrap();
//!     let sold = client
//!         .perform_action(ProductId(8), ProductAction::DecrementStock(5))
//!         .await
//!         .unwrap();
//!     assert!(matches!(sold, ProductActionResult::DecrementStock(p) if p.stock == 0));
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;
pub mod fallback;

pub use actions::*;
pub use error::*;
pub use fallback::fallback_catalog;

use crate::model::{Product, ProductId};
use commerce_actor::{ResourceActor, ResourceClient};

/// Creates a new catalog actor and its client. Local ids are allocated as `max + 1`.
pub fn new(buffer_size: usize) -> (ResourceActor<Product>, ResourceClient<Product>) {
    ResourceActor::with_id_generator(buffer_size, |max: Option<&ProductId>| {
        max.map_or(Some(ProductId(1)), |id| id.next())
    })
}
