//! Error types for checkout.

use crate::model::OrderRef;
use crate::remote::ApiError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    /// Another checkout of this cart is still submitting.
    #[error("Checkout already in progress")]
    InProgress,

    /// The order service did not acknowledge the order. The attempt stays in
    /// the order history under `reference`.
    #[error("Order {reference} not acknowledged: {source}")]
    Submission {
        reference: OrderRef,
        #[source]
        source: ApiError,
    },

    /// The caller stopped waiting. The submission carries on and its outcome
    /// is applied to the stores.
    #[error("Checkout abandoned by caller")]
    Abandoned,

    #[error("Store error: {0}")]
    Store(String),

    #[error("Checkout task failed: {0}")]
    TaskFailed(String),
}

impl CheckoutError {
    /// Whether the service may have stored the order anyway.
    pub fn outcome_uncertain(&self) -> bool {
        match self {
            CheckoutError::Submission { source, .. } => source.outcome_uncertain(),
            CheckoutError::Abandoned => true,
            _ => false,
        }
    }

    /// Whether trying again could succeed. Rejected orders will be rejected again.
    pub fn is_retryable(&self) -> bool {
        match self {
            CheckoutError::Submission { source, .. } => source.outcome_uncertain(),
            CheckoutError::InProgress | CheckoutError::Abandoned => true,
            _ => false,
        }
    }
}

impl From<String> for CheckoutError {
    fn from(msg: String) -> Self {
        CheckoutError::Store(msg)
    }
}
