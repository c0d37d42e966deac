//! # Typed Clients
//!
//! Each client wraps a [`ResourceClient`](commerce_actor::ResourceClient)
//! and exposes the operations callers actually use, with the actor's own error
//! type instead of [`FrameworkError`]. All of them are cheap to clone.

pub mod account_client;
pub mod cart_client;
pub mod catalog_client;
pub mod favorites_client;
pub mod loyalty_client;
pub mod order_client;

pub use account_client::AccountClient;
pub use cart_client::{CartClient, RestoredCart};
pub use catalog_client::{CatalogClient, CatalogLoad, CatalogSource};
pub use favorites_client::FavoritesClient;
pub use loyalty_client::LoyaltyClient;
pub use order_client::OrderClient;

use commerce_actor::FrameworkError;

/// Unwraps an entity error carried by the actor, or falls back to `E::from(message)`.
pub(crate) fn typed_error<E>(e: FrameworkError) -> E
where
    E: std::error::Error + From<String> + Send + Sync + 'static,
{
    match e.into_entity_error::<E>() {
        Ok(inner) => inner,
        Err(other) => E::from(other.to_string()),
    }
}
