//! # Commerce Actor
//!
//! Single-writer stores for the commerce engine. Each store is a
//! [`ResourceActor`] task that owns its entries and applies requests one at a
//! time; callers talk to it through a cloneable [`ResourceClient`].
//!
//! ## Layers
//!
//! 1. **Entity** ([`ActorEntity`]): the entry type and its hooks.
//! 2. **Runtime** ([`ResourceActor`]): the request loop and the ordered store.
//! 3. **Interface** ([`ResourceClient`], [`ActorClient`]): typed requests and replies.
//!
//! ## Context Injection
//!
//! Dependencies are bound in `run(context)`, not in `new()`. An actor can
//! therefore hold the clients of actors created alongside it:
//!
//! ```rust,ignore
//! let (catalog_actor, catalog) = catalog_actor::new(32);
//! let (cart_actor, cart) = cart_actor::new(32);
//!
//! tokio::spawn(catalog_actor.run(()));
//! tokio::spawn(cart_actor.run(CartContext::new(kv, "cart")));
//! ```
//!
//! ## Store Semantics
//!
//! - Entries are kept in key order; `list()` returns them that way.
//! - `update` and `perform_action` work on a copy and commit only on success.
//! - [`ActorEntity::vacant`] and [`ActorEntity::is_vacant`] give get-or-create
//!   and remove-when-empty behavior without extra round trips.
//! - [`ActorEntity::on_store_changed`] sees the store after every committed
//!   mutation and is where entries get persisted.
//!
//! ## Shutdown
//!
//! An actor stops when every client clone has been dropped: `recv()` returns
//! `None`, the loop logs its final size and the task ends.
//!
//! ## Testing
//!
//! See [`mock`] for [`mock::MockClient`], which answers requests from scripted
//! expectations instead of a running actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

pub use actor::{IdGenerator, ResourceActor};
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
