//! # Cart Actor
//!
//! Holds the shopping cart as product-keyed lines and persists it through a
//! [`KeyValueStore`](crate::storage::KeyValueStore) after every change.
//!
//! ## Structure
//!
//! - [`entity`]: [`ActorEntity`](commerce_actor::ActorEntity) for [`CartLine`], plus [`CartAction`] and [`CartContext`]
//! - [`codec`]: the versioned string encoding written to storage
//! - [`error`]: [`CartError`]
//!
//! Prices never live in the cart. Totals are computed against the catalog at
//! read time, see [`CartClient`](crate::clients::CartClient).

pub mod codec;
pub mod entity;
pub mod error;

pub use entity::{CartAction, CartContext};
pub use error::*;

use crate::model::CartLine;
use commerce_actor::{ResourceActor, ResourceClient};

/// Creates a new cart actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<CartLine>, ResourceClient<CartLine>) {
    ResourceActor::new(buffer_size)
}
