use super::typed_error;
use crate::account_actor::AccountError;
use crate::model::{Account, UserId};
use async_trait::async_trait;
use commerce_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::info;

/// Registration and lookup by canonical email.
#[derive(Clone)]
pub struct AccountClient {
    inner: ResourceClient<Account>,
}

impl AccountClient {
    pub fn new(inner: ResourceClient<Account>) -> Self {
        Self { inner }
    }

    /// Registers a new account. The email is canonicalized first, so
    /// `Ana@Shop.test` and `ana@shop.test` are the same account.
    pub async fn register(&self, email: &str, name: &str) -> Result<UserId, AccountError> {
        let id = UserId::parse(email)?;
        if name.trim().is_empty() {
            return Err(AccountError::BlankName);
        }
        let account = Account::new(id.clone(), name.trim());
        match self.inner.insert(account).await {
            Ok(id) => {
                info!(user = %id, "Account registered");
                Ok(id)
            }
            Err(FrameworkError::AlreadyExists(_)) => Err(AccountError::AlreadyRegistered(id)),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    pub async fn find(&self, email: &str) -> Result<Option<Account>, AccountError> {
        let id = UserId::parse(email)?;
        self.get(id).await
    }
}

#[async_trait]
impl ActorClient<Account> for AccountClient {
    type Error = AccountError;

    fn inner(&self) -> &ResourceClient<Account> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        typed_error(e)
    }
}
