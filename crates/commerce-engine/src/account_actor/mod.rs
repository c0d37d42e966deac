//! # Account Actor
//!
//! Registered shoppers keyed by canonical email. Registration uses a strict
//! insert, so two accounts can never share an identity even when the emails
//! differ in case or surrounding whitespace.

use crate::model::{Account, InvalidUserId, UserId};
use async_trait::async_trait;
use commerce_actor::{ActorEntity, ResourceActor, ResourceClient};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AccountError {
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] InvalidUserId),

    #[error("Account already registered: {0}")]
    AlreadyRegistered(UserId),

    #[error("Account name must not be blank")]
    BlankName,

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for AccountError {
    fn from(msg: String) -> Self {
        AccountError::ActorCommunicationError(msg)
    }
}

#[async_trait]
impl ActorEntity for Account {
    type Id = UserId;
    type Create = String;
    /// New display name.
    type Update = String;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = AccountError;

    fn id(&self) -> UserId {
        self.id.clone()
    }

    fn from_create_params(id: UserId, name: String) -> Result<Self, AccountError> {
        Ok(Account::new(id, name))
    }

    async fn on_create(&mut self, _ctx: &()) -> Result<(), AccountError> {
        if self.name.trim().is_empty() {
            return Err(AccountError::BlankName);
        }
        Ok(())
    }

    async fn on_update(&mut self, name: String, _ctx: &()) -> Result<(), AccountError> {
        if name.trim().is_empty() {
            return Err(AccountError::BlankName);
        }
        self.name = name;
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), AccountError> {
        Ok(())
    }
}

/// Creates a new account actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Account>, ResourceClient<Account>) {
    ResourceActor::new(buffer_size)
}
