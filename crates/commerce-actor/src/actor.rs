//! # Generic Actor Server
//!
//! The `ResourceActor` owns one store of entities and processes requests
//! sequentially, so the store needs no locks. Every client-visible mutation
//! of catalog, cart, favorites, loyalty and order history goes through one of
//! these loops.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Produces the id for a `Create` request from the greatest id currently stored.
/// Returns `None` once the id space is used up.
pub type IdGenerator<Id> = Box<dyn Fn(Option<&Id>) -> Option<Id> + Send + Sync>;

/// The generic actor that manages a collection of entities.
///
/// This is the "server" half: it owns the `store` and the receiving end of
/// the channel. The matching [`ResourceClient`] is the cheap, cloneable half.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceActor::new()` returns the actor and its client.
/// 2.  **Wire**: pass dependencies (other clients, storage handles) into `actor.run(context)`.
/// 3.  **Run**: spawn the run loop on a Tokio task.
///
/// ```rust
/// use commerce_actor::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Tag { id: u32, label: String }
/// #[derive(Debug)] struct TagCreate { label: String }
/// #[derive(Debug)] enum TagAction {}
/// #[derive(Debug, thiserror::Error)] #[error("tag error")] struct TagError;
///
/// #[async_trait]
/// impl ActorEntity for Tag {
///     type Id = u32;
///     type Create = TagCreate;
///     type Update = String;
///     type Action = TagAction;
///     type ActionResult = ();
///     type Context = ();
///     type Error = TagError;
///
///     fn id(&self) -> u32 { self.id }
///     fn from_create_params(id: u32, p: TagCreate) -> Result<Self, TagError> {
///         Ok(Self { id, label: p.label })
///     }
///     async fn on_update(&mut self, label: String, _: &()) -> Result<(), TagError> {
///         self.label = label;
///         Ok(())
///     }
///     async fn handle_action(&mut self, a: TagAction, _: &()) -> Result<(), TagError> {
///         match a {}
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) =
///         ResourceActor::<Tag>::with_id_generator(10, |max| max.map_or(Some(1), |id| id.checked_add(1)));
///     tokio::spawn(actor.run(()));
///
///     let id = client.create(TagCreate { label: "sale".into() }).await.unwrap();
///     assert_eq!(id, 1);
/// }
/// ```
///
/// # Operations
///
/// * **Create**: asks the id generator for a key, builds the entry, runs
///   `on_create`, stores it. Fails with `NoIdGenerator` on actors whose keys
///   come from the caller and with `IdsExhausted` when the generator has none left.
/// * **Update** / **Action**: run against a copy of the entry and commit only
///   on success, so a failed hook leaves the store exactly as it was.
///   Actions on an unknown key start from [`ActorEntity::vacant`] when the
///   entity provides one. Entries left vacant are removed.
/// * **Replace**: swaps the entire store and hands back the old contents,
///   which is how callers restore a snapshot.
///
/// After every committed mutation the actor calls
/// [`ActorEntity::on_store_changed`] with the new contents.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    next_id: Option<IdGenerator<T::Id>>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates an actor whose entries are keyed by the caller.
    ///
    /// `buffer_size` is the channel capacity; senders wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            next_id: None,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Creates an actor that can also generate keys for `Create` requests.
    pub fn with_id_generator<F>(buffer_size: usize, next_id: F) -> (Self, ResourceClient<T>)
    where
        F: Fn(Option<&T::Id>) -> Option<T::Id> + Send + Sync + 'static,
    {
        let (mut actor, client) = Self::new(buffer_size);
        actor.next_id = Some(Box::new(next_id));
        (actor, client)
    }

    fn snapshot(&self) -> Vec<T> {
        self.store.values().cloned().collect()
    }

    async fn store_changed(&self, context: &T::Context) {
        T::on_store_changed(&self.snapshot(), context).await;
    }

    /// Runs the event loop until every client has been dropped.
    ///
    /// `context` is handed to every hook, which lets dependencies be created
    /// after the actor but before the loop starts.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let Some(next_id) = &self.next_id else {
                        warn!(entity_type, "Create without id generator");
                        let _ = respond_to.send(Err(FrameworkError::NoIdGenerator));
                        continue;
                    };
                    let Some(id) = next_id(self.store.keys().next_back()) else {
                        warn!(entity_type, "Create with id space exhausted");
                        let _ = respond_to.send(Err(FrameworkError::IdsExhausted));
                        continue;
                    };

                    match T::from_create_params(id.clone(), params) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create(&context).await {
                                warn!(entity_type, error = %e, "on_create failed");
                                let _ =
                                    respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                                continue;
                            }
                            self.store.insert(id.clone(), item);
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            self.store_changed(&context).await;
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Insert {
                    mut item,
                    respond_to,
                } => {
                    let id = item.id();
                    debug!(entity_type, %id, "Insert");
                    if self.store.contains_key(&id) {
                        warn!(entity_type, %id, "Already exists");
                        let _ = respond_to.send(Err(FrameworkError::AlreadyExists(id.to_string())));
                        continue;
                    }
                    if let Err(e) = item.on_create(&context).await {
                        warn!(entity_type, %id, error = %e, "on_create failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    self.store.insert(id.clone(), item);
                    info!(entity_type, %id, size = self.store.len(), "Inserted");
                    self.store_changed(&context).await;
                    let _ = respond_to.send(Ok(id));
                }
                ResourceRequest::Upsert { item, respond_to } => {
                    let id = item.id();
                    debug!(entity_type, %id, "Upsert");
                    let previous = self.store.insert(id.clone(), item);
                    info!(entity_type, %id, replaced = previous.is_some(), "Upserted");
                    self.store_changed(&context).await;
                    let _ = respond_to.send(Ok(previous));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    debug!(entity_type, size = self.store.len(), "List");
                    let _ = respond_to.send(Ok(self.snapshot()));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(mut item) = self.store.get(&id).cloned() else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_update(update, &context).await {
                        warn!(entity_type, %id, error = %e, "Update failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    if item.is_vacant() {
                        self.store.remove(&id);
                        info!(entity_type, %id, size = self.store.len(), "Updated to vacant, removed");
                    } else {
                        self.store.insert(id.clone(), item.clone());
                        info!(entity_type, %id, "Updated");
                    }
                    self.store_changed(&context).await;
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let Some(item) = self.store.get(&id) else {
                        debug!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_delete(&context).await {
                        warn!(entity_type, %id, error = %e, "on_delete failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    let removed = self.store.remove(&id);
                    info!(entity_type, %id, size = self.store.len(), "Deleted");
                    self.store_changed(&context).await;
                    let _ = respond_to.send(removed.ok_or(FrameworkError::NotFound(id.to_string())));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let existing = self.store.get(&id).cloned();
                    let fresh = existing.is_none();
                    let Some(mut item) = existing.or_else(|| T::vacant(&id)) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    match item.handle_action(action, &context).await {
                        Ok(result) => {
                            if item.is_vacant() {
                                self.store.remove(&id);
                            } else {
                                self.store.insert(id.clone(), item);
                            }
                            info!(entity_type, %id, fresh, "Action ok");
                            self.store_changed(&context).await;
                            let _ = respond_to.send(Ok(result));
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Action failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Replace { items, respond_to } => {
                    let previous = std::mem::take(&mut self.store);
                    self.store = items.into_iter().map(|item| (item.id(), item)).collect();
                    info!(
                        entity_type,
                        previous = previous.len(),
                        size = self.store.len(),
                        "Replaced"
                    );
                    self.store_changed(&context).await;
                    let _ = respond_to.send(Ok(previous.into_values().collect()));
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        id: u32,
        hits: u32,
    }

    #[derive(Debug)]
    enum CounterAction {
        Hit,
        Fail,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("counter rejected the request")]
    struct CounterError;

    type Writes = Arc<Mutex<Vec<usize>>>;

    #[async_trait]
    impl ActorEntity for Counter {
        type Id = u32;
        type Create = u32;
        type Update = u32;
        type Action = CounterAction;
        type ActionResult = u32;
        type Context = Writes;
        type Error = CounterError;

        fn id(&self) -> u32 {
            self.id
        }

        fn from_create_params(id: u32, hits: u32) -> Result<Self, CounterError> {
            Ok(Self { id, hits })
        }

        fn vacant(id: &u32) -> Option<Self> {
            Some(Self { id: *id, hits: 0 })
        }

        fn is_vacant(&self) -> bool {
            self.hits == 0
        }

        async fn on_update(&mut self, hits: u32, _ctx: &Writes) -> Result<(), CounterError> {
            if hits > 100 {
                return Err(CounterError);
            }
            self.hits = hits;
            Ok(())
        }

        async fn handle_action(
            &mut self,
            action: CounterAction,
            _ctx: &Writes,
        ) -> Result<u32, CounterError> {
            match action {
                CounterAction::Hit => {
                    self.hits += 1;
                    Ok(self.hits)
                }
                CounterAction::Fail => {
                    self.hits += 50;
                    Err(CounterError)
                }
            }
        }

        async fn on_store_changed(items: &[Self], ctx: &Writes) {
            ctx.lock().unwrap().push(items.len());
        }
    }

    fn spawn_counter() -> (ResourceClient<Counter>, Writes) {
        let writes = Writes::default();
        let (actor, client) =
            ResourceActor::<Counter>::with_id_generator(8, |max| match max {
                Some(id) => id.checked_add(1),
                None => Some(1),
            });
        tokio::spawn(actor.run(writes.clone()));
        (client, writes)
    }

    #[tokio::test]
    async fn test_create_uses_greatest_stored_id() {
        let (client, _) = spawn_counter();

        client.upsert(Counter { id: 41, hits: 1 }).await.unwrap();
        let id = client.create(3).await.unwrap();
        assert_eq!(id, 42);
    }

    #[tokio::test]
    async fn test_action_on_unknown_id_starts_from_vacant() {
        let (client, _) = spawn_counter();

        assert_eq!(client.perform_action(7, CounterAction::Hit).await.unwrap(), 1);
        assert_eq!(client.perform_action(7, CounterAction::Hit).await.unwrap(), 2);
        assert_eq!(client.get(7).await.unwrap().unwrap().hits, 2);
    }

    #[tokio::test]
    async fn test_failed_action_leaves_store_untouched() {
        let (client, writes) = spawn_counter();
        client.upsert(Counter { id: 1, hits: 5 }).await.unwrap();

        let result = client.perform_action(1, CounterAction::Fail).await;
        assert!(matches!(result, Err(FrameworkError::EntityError(_))));
        assert_eq!(client.get(1).await.unwrap().unwrap().hits, 5);

        // A failed action on a fresh key must not leave the vacant entry behind.
        assert!(client.perform_action(9, CounterAction::Fail).await.is_err());
        assert!(client.get(9).await.unwrap().is_none());
        assert_eq!(*writes.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_update_to_vacant_removes_entry() {
        let (client, writes) = spawn_counter();
        client.upsert(Counter { id: 1, hits: 5 }).await.unwrap();

        client.update(1, 0).await.unwrap();
        assert!(client.list().await.unwrap().is_empty());
        assert_eq!(*writes.lock().unwrap(), vec![1, 0]);

        let missing = client.update(1, 3).await;
        assert!(matches!(missing, Err(FrameworkError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_insert_rejects_taken_key() {
        let (client, _) = spawn_counter();
        client.insert(Counter { id: 2, hits: 1 }).await.unwrap();

        let again = client.insert(Counter { id: 2, hits: 9 }).await;
        assert!(matches!(again, Err(FrameworkError::AlreadyExists(_))));
        assert_eq!(client.get(2).await.unwrap().unwrap().hits, 1);
    }

    #[tokio::test]
    async fn test_replace_returns_previous_contents_in_key_order() {
        let (client, _) = spawn_counter();
        client.upsert(Counter { id: 3, hits: 1 }).await.unwrap();
        client.upsert(Counter { id: 1, hits: 1 }).await.unwrap();

        let previous = client.replace(vec![Counter { id: 8, hits: 4 }]).await.unwrap();
        let ids: Vec<u32> = previous.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(client.list().await.unwrap(), vec![Counter { id: 8, hits: 4 }]);
    }

    #[tokio::test]
    async fn test_create_without_generator_is_rejected() {
        let (actor, client) = ResourceActor::<Counter>::new(4);
        tokio::spawn(actor.run(Writes::default()));

        let result = client.create(1).await;
        assert!(matches!(result, Err(FrameworkError::NoIdGenerator)));
    }

    #[tokio::test]
    async fn test_create_with_exhausted_ids_keeps_actor_alive() {
        let (client, _writes) = spawn_counter();
        client.upsert(Counter { id: u32::MAX, hits: 1 }).await.unwrap();

        let result = client.create(2).await;
        assert!(matches!(result, Err(FrameworkError::IdsExhausted)));
        assert_eq!(client.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_returns_removed_entry() {
        let (client, _) = spawn_counter();
        client.upsert(Counter { id: 4, hits: 2 }).await.unwrap();

        let removed = client.delete(4).await.unwrap();
        assert_eq!(removed.hits, 2);
        assert!(matches!(client.delete(4).await, Err(FrameworkError::NotFound(_))));
    }
}
