//! # Generic Messages
//!
//! Requests a [`ResourceClient`](crate::ResourceClient) sends to its
//! [`ResourceActor`](crate::ResourceActor), each carrying a oneshot sender for the reply.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor.
///
/// Besides CRUD and `Action`, a store actor answers whole-store requests
/// (`List`, `Replace`) and keyed writes where the caller chooses the id
/// (`Insert`, `Upsert`).
///
/// - **Create**: builds an entry under a generated id.
/// - **Insert**: stores a caller-keyed entry; fails if the key is taken.
/// - **Upsert**: stores a caller-keyed entry, returning what it replaced.
/// - **Get** / **List**: reads one entry or the whole store in key order.
/// - **Update**: mutates an entry through [`ActorEntity::on_update`].
/// - **Delete**: removes an entry, returning it.
/// - **Action**: runs an [`ActorEntity::Action`].
/// - **Replace**: swaps the whole store, returning the previous contents.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Insert {
        item: T,
        respond_to: Response<T::Id>,
    },
    Upsert {
        item: T,
        respond_to: Response<Option<T>>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<T>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Replace {
        items: Vec<T>,
        respond_to: Response<Vec<T>>,
    },
}
