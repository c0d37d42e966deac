//! # Mock Clients
//!
//! [`MockClient<T>`] hands out a real [`ResourceClient<T>`] whose requests are
//! answered from a queue of expectations instead of a running actor. Use it to
//! test a typed client or an actor's hooks without the actors they talk to.
//!
//! | | MockClient | Real actor |
//! |---|---|---|
//! | **State** | Scripted answers | Real store |
//! | **Use case** | Logic *around* a client | The actor itself, full flows |
//! | **Error injection** | `return_err` | Needs crafted state |
//!
//! ```rust
//! use commerce_actor::mock::MockClient;
//! use commerce_actor::{ActorEntity, FrameworkError};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug, PartialEq)] struct Sku { id: u32, stock: u32 }
//! #[derive(Debug)] enum SkuAction {}
//! #[derive(Debug, thiserror::Error)] #[error("sku error")] struct SkuError;
//!
//! #[async_trait]
//! impl ActorEntity for Sku {
//!     type Id = u32; type Create = (); type Update = ();
//!     type Action = SkuAction; type ActionResult = (); type Context = (); type Error = SkuError;
//!     fn id(&self) -> u32 { self.id }
//!     fn from_create_params(id: u32, _: ()) -> Result<Self, SkuError> { Ok(Self { id, stock: 0 }) }
//!     async fn on_update(&mut self, _: (), _: &()) -> Result<(), SkuError> { Ok(()) }
//!     async fn handle_action(&mut self, a: SkuAction, _: &()) -> Result<(), SkuError> { match a {} }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Sku>::new();
//!     mock.expect_list().return_ok(vec![Sku { id: 1, stock: 3 }]);
//!     mock.expect_get(2).return_err(FrameworkError::ActorClosed);
//!
//!     let client = mock.client();
//!     assert_eq!(client.list().await.unwrap().len(), 1);
//!     assert!(matches!(client.get(2).await, Err(FrameworkError::ActorClosed)));
//!     mock.verify();
//! }
//! ```
//!
//! For full control over the reply, [`create_mock_client`] returns the raw
//! request receiver and [`expect_action`] pulls the next action off it.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, oneshot};

type Reply<R> = Result<R, FrameworkError>;

/// A scripted answer for the next request the mock receives.
enum Expectation<T: ActorEntity> {
    Create(Reply<T::Id>),
    Insert(Reply<T::Id>),
    Upsert(Reply<Option<T>>),
    Get { id: T::Id, response: Reply<Option<T>> },
    List(Reply<Vec<T>>),
    Update { id: T::Id, response: Reply<T> },
    Delete { id: T::Id, response: Reply<T> },
    Action { id: T::Id, response: Reply<T::ActionResult> },
    Replace(Reply<Vec<T>>),
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn check_id<I: PartialEq + std::fmt::Debug>(op: &str, expected: &I, actual: &I) {
    if expected != actual {
        panic!("{op} expected id {expected:?}, got {actual:?}");
    }
}

fn answer<R>(respond_to: oneshot::Sender<Reply<R>>, response: Reply<R>) {
    let _ = respond_to.send(response);
}

/// A mock client with expectation tracking.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations. Must run inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .pop_front();

                match (request, expectation) {
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create(r))) => {
                        answer(respond_to, r)
                    }
                    (ResourceRequest::Insert { respond_to, .. }, Some(Expectation::Insert(r))) => {
                        answer(respond_to, r)
                    }
                    (ResourceRequest::Upsert { respond_to, .. }, Some(Expectation::Upsert(r))) => {
                        answer(respond_to, r)
                    }
                    (
                        ResourceRequest::Get { id, respond_to },
                        Some(Expectation::Get { id: expected, response }),
                    ) => {
                        check_id("get", &expected, &id);
                        answer(respond_to, response)
                    }
                    (ResourceRequest::List { respond_to }, Some(Expectation::List(r))) => {
                        answer(respond_to, r)
                    }
                    (
                        ResourceRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update { id: expected, response }),
                    ) => {
                        check_id("update", &expected, &id);
                        answer(respond_to, response)
                    }
                    (
                        ResourceRequest::Delete { id, respond_to },
                        Some(Expectation::Delete { id: expected, response }),
                    ) => {
                        check_id("delete", &expected, &id);
                        answer(respond_to, response)
                    }
                    (
                        ResourceRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action { id: expected, response }),
                    ) => {
                        check_id("action", &expected, &id);
                        answer(respond_to, response)
                    }
                    (ResourceRequest::Replace { respond_to, .. }, Some(Expectation::Replace(r))) => {
                        answer(respond_to, r)
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    fn builder<R>(
        &self,
        wrap: impl FnOnce(Reply<R>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            wrap: Box::new(wrap),
        }
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.builder(Expectation::Create)
    }

    pub fn expect_insert(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.builder(Expectation::Insert)
    }

    pub fn expect_upsert(&mut self) -> ExpectationBuilder<T, Option<T>> {
        self.builder(Expectation::Upsert)
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |response| Expectation::Get { id, response })
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(Expectation::List)
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |response| Expectation::Update { id, response })
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |response| Expectation::Delete { id, response })
    }

    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(move |response| Expectation::Action { id, response })
    }

    pub fn expect_replace(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(Expectation::Replace)
    }

    /// Panics if any expectation was not consumed.
    pub fn verify(&self) {
        let remaining = self
            .expectations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        if remaining != 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Queues the answer for one expected request.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    expectations: Queue<T>,
    wrap: Box<dyn FnOnce(Reply<R>) -> Expectation<T> + Send>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    fn push(self, response: Reply<R>) {
        let expectation = (self.wrap)(response);
        self.expectations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(expectation);
    }

    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }
}

/// Creates a client and the receiver its requests arrive on.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Takes the next request if it is an `Action`.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, oneshot::Sender<Reply<T::ActionResult>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Shelf {
        id: u32,
        slots: u32,
    }

    #[derive(Debug)]
    enum ShelfAction {
        Fill(u32),
    }

    #[derive(Debug, thiserror::Error)]
    #[error("shelf error")]
    struct ShelfError;

    #[async_trait]
    impl ActorEntity for Shelf {
        type Id = u32;
        type Create = u32;
        type Update = u32;
        type Action = ShelfAction;
        type ActionResult = u32;
        type Context = ();
        type Error = ShelfError;

        fn id(&self) -> u32 {
            self.id
        }

        fn from_create_params(id: u32, slots: u32) -> Result<Self, ShelfError> {
            Ok(Self { id, slots })
        }

        async fn on_update(&mut self, slots: u32, _ctx: &()) -> Result<(), ShelfError> {
            self.slots = slots;
            Ok(())
        }

        async fn handle_action(&mut self, action: ShelfAction, _ctx: &()) -> Result<u32, ShelfError> {
            match action {
                ShelfAction::Fill(n) => {
                    self.slots += n;
                    Ok(self.slots)
                }
            }
        }
    }

    #[tokio::test]
    async fn test_raw_receiver_answers_action() {
        let (client, mut receiver) = create_mock_client::<Shelf>(4);

        let task = tokio::spawn(async move { client.perform_action(3, ShelfAction::Fill(2)).await });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, 3);
        assert!(matches!(action, ShelfAction::Fill(2)));
        responder.send(Ok(7)).unwrap();

        assert_eq!(task.await.unwrap().unwrap(), 7);
    }

    #[tokio::test]
    async fn test_expectations_answer_in_order() {
        let mut mock = MockClient::<Shelf>::new();
        mock.expect_create().return_ok(1);
        mock.expect_upsert().return_ok(None);
        mock.expect_delete(1)
            .return_ok(Shelf { id: 1, slots: 4 });
        mock.expect_replace().return_ok(vec![]);

        let client = mock.client();
        assert_eq!(client.create(4).await.unwrap(), 1);
        assert!(client.upsert(Shelf { id: 2, slots: 1 }).await.unwrap().is_none());
        assert_eq!(client.delete(1).await.unwrap().slots, 4);
        assert!(client.replace(vec![]).await.unwrap().is_empty());

        mock.verify();
    }

    #[tokio::test]
    async fn test_unexpected_request_drops_reply() {
        let mock = MockClient::<Shelf>::new();
        let result = mock.client().list().await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));
    }
}
