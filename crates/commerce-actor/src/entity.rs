//! # ActorEntity Trait
//!
//! The contract every store entry (catalog product, cart line, favorite set,
//! loyalty account, order record) implements so that one generic
//! [`ResourceActor`](crate::ResourceActor) can own it.
//!
//! Associated types pin down the payload of each operation, so a cart update
//! can never be sent to the catalog actor. Lifecycle hooks receive the actor's
//! `Context`, which is bound late in `run()` rather than in `new()`.
//!
//! # Provided Methods
//! - [`ActorEntity::on_create`], [`ActorEntity::on_delete`] default to `Ok(())`.
//! - [`ActorEntity::vacant`] lets an action create its target on first use.
//! - [`ActorEntity::is_vacant`] lets the actor drop entries that no longer hold anything.
//! - [`ActorEntity::on_store_changed`] runs after every committed mutation.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any store entry must implement to be managed by `ResourceActor`.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Key of the entry. Ordered so listings come back in a stable order.
    type Id: Eq + Ord + Hash + Clone + Send + Sync + Display + Debug;

    /// Payload for creating an entry under a generated id.
    type Create: Send + Sync + Debug;

    /// Payload for mutating an existing entry.
    type Update: Send + Sync + Debug;

    /// Entity-specific operations beyond CRUD.
    type Action: Send + Sync + Debug;

    /// Result of an [`ActorEntity::Action`].
    type ActionResult: Send + Sync + Debug;

    /// Dependencies injected at `run()`. Use `()` if none are needed.
    type Context: Send + Sync;

    /// One error enum per actor, shared by every hook.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The key this entry is stored under.
    fn id(&self) -> Self::Id;

    /// Builds the entry from a generated id and the create payload.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// The empty entry an action may start from when `id` is not stored yet.
    ///
    /// Returning `None` (the default) makes actions on unknown ids fail with
    /// `NotFound`. A fresh entry is only kept if the action succeeds.
    fn vacant(_id: &Self::Id) -> Option<Self> {
        None
    }

    /// Whether the entry holds nothing worth keeping.
    ///
    /// Checked after updates and actions; vacant entries are removed.
    fn is_vacant(&self) -> bool {
        false
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called after construction, before the entry is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies an update in place. An error leaves the stored entry untouched.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called before the entry is removed.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handles an entity-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;

    /// Called with the full contents of the store after each committed mutation.
    ///
    /// This is the persistence seam: it cannot fail the mutation, so
    /// implementations log their own errors.
    async fn on_store_changed(_items: &[Self], _ctx: &Self::Context) {}
}
