//! # Checkout
//!
//! Turns the cart into a submitted order. One attempt moves through
//! `Idle -> Submitting -> Succeeded | Failed`, published on a `watch` channel
//! so observers can follow it.
//!
//! Submission runs in a spawned task. A caller that stops waiting, by
//! dropping the future or cancelling the token passed to
//! [`CheckoutOrchestrator::checkout_until_cancelled`], does not stop it: the
//! outcome is still applied to the cart, catalog and order history.
//!
//! On acknowledgement the purchased stock is decremented (floored at zero),
//! each changed product is pushed to the service on a best-effort basis, and
//! the cart is cleared. On any other outcome cart and stock are left alone and
//! the attempt stays in the order history as uncertain or rejected.

pub mod error;
pub mod quote;

pub use error::CheckoutError;
pub use quote::CheckoutQuote;

use crate::clients::{CartClient, CatalogClient, LoyaltyClient, OrderClient};
use crate::model::{Order, OrderAck, OrderLine, OrderRef, ProductId, ResolvedLine, UserId};
use crate::remote::{with_timeout, CommerceApi};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn, Instrument};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckoutState {
    #[default]
    Idle,
    Submitting,
    Succeeded {
        reference: OrderRef,
        remote_id: String,
    },
    Failed {
        reference: Option<OrderRef>,
        reason: String,
    },
}

/// What a successful checkout produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    pub reference: OrderRef,
    pub order: Order,
    pub ack: OrderAck,
    pub quote: CheckoutQuote,
    /// Products whose new stock level the service did not accept.
    pub stock_sync_failures: Vec<ProductId>,
}

fn store_error(e: impl Display) -> CheckoutError {
    CheckoutError::Store(e.to_string())
}

/// Runs checkouts for one cart.
#[derive(Clone)]
pub struct CheckoutOrchestrator {
    cart: CartClient,
    catalog: CatalogClient,
    orders: OrderClient,
    loyalty: LoyaltyClient,
    api: Arc<dyn CommerceApi>,
    timeout: Duration,
    state: Arc<watch::Sender<CheckoutState>>,
}

impl CheckoutOrchestrator {
    pub fn new(
        cart: CartClient,
        catalog: CatalogClient,
        orders: OrderClient,
        loyalty: LoyaltyClient,
        api: Arc<dyn CommerceApi>,
        timeout: Duration,
    ) -> Self {
        let (state, _) = watch::channel(CheckoutState::Idle);
        Self {
            cart,
            catalog,
            orders,
            loyalty,
            api,
            timeout,
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CheckoutState> {
        self.state.subscribe()
    }

    /// Subtotal, loyalty discount and payable amount for the current cart.
    pub async fn quote(&self, user: &UserId) -> Result<CheckoutQuote, CheckoutError> {
        let subtotal = self.cart.total().await.map_err(store_error)?;
        let percent = self.loyalty.discount_percent(user).await.map_err(store_error)?;
        Ok(CheckoutQuote::new(subtotal, percent))
    }

    /// Submits the cart as an order for `user` and waits for the outcome.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`] without contacting the service.
    /// - [`CheckoutError::InProgress`] while another checkout is submitting.
    /// - [`CheckoutError::Submission`] when the service did not acknowledge the order.
    pub async fn checkout(&self, user: &UserId) -> Result<CheckoutReceipt, CheckoutError> {
        let task = self.begin(user).await?;
        task.await
            .map_err(|e| CheckoutError::TaskFailed(e.to_string()))?
    }

    /// Like [`checkout`](Self::checkout), but stops waiting when `token` is
    /// cancelled. The submission itself runs to completion either way.
    pub async fn checkout_until_cancelled(
        &self,
        user: &UserId,
        token: &CancellationToken,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let task = self.begin(user).await?;
        tokio::select! {
            joined = task => joined.map_err(|e| CheckoutError::TaskFailed(e.to_string()))?,
            _ = token.cancelled() => {
                info!(%user, "Caller stopped waiting for checkout");
                Err(CheckoutError::Abandoned)
            }
        }
    }

    async fn begin(
        &self,
        user: &UserId,
    ) -> Result<JoinHandle<Result<CheckoutReceipt, CheckoutError>>, CheckoutError> {
        // A running checkout may already have emptied the cart.
        if *self.state.borrow() == CheckoutState::Submitting {
            warn!(%user, "Checkout rejected: another one is submitting");
            return Err(CheckoutError::InProgress);
        }
        let lines = self.cart.resolved_lines().await.map_err(store_error)?;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let acquired = self.state.send_if_modified(|state| {
            if *state == CheckoutState::Submitting {
                false
            } else {
                *state = CheckoutState::Submitting;
                true
            }
        });
        if !acquired {
            warn!(%user, "Checkout rejected: another one is submitting");
            return Err(CheckoutError::InProgress);
        }

        let this = self.clone();
        let user = user.clone();
        let span = tracing::info_span!("checkout", %user);
        Ok(tokio::spawn(
            async move { this.run(user, lines).await }.instrument(span),
        ))
    }

    async fn run(
        &self,
        user: UserId,
        lines: Vec<ResolvedLine>,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let mut reference = None;
        let outcome = self.submit(&user, lines, &mut reference).await;
        let next = match &outcome {
            Ok(receipt) => CheckoutState::Succeeded {
                reference: receipt.reference,
                remote_id: receipt.ack.remote_id.clone(),
            },
            Err(e) => CheckoutState::Failed {
                reference,
                reason: e.to_string(),
            },
        };
        self.state.send_replace(next);
        outcome
    }

    #[instrument(skip_all)]
    async fn submit(
        &self,
        user: &UserId,
        lines: Vec<ResolvedLine>,
        reference_out: &mut Option<OrderRef>,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let order = Order::new(user.clone(), lines.iter().map(OrderLine::from).collect());
        let percent = self.loyalty.discount_percent(user).await.map_err(store_error)?;
        let quote = CheckoutQuote::new(order.total, percent);

        let reference = self
            .orders
            .record_pending(order.clone())
            .await
            .map_err(store_error)?;
        *reference_out = Some(reference);
        info!(%reference, total = %order.total, items = order.item_count(), "Submitting order");

        let ack = match with_timeout(self.timeout, self.api.submit_order(&order)).await {
            Ok(ack) => ack,
            Err(e) => {
                let recorded = if e.outcome_uncertain() {
                    self.orders.mark_uncertain(reference, e.to_string()).await
                } else {
                    self.orders.reject(reference, e.to_string()).await
                };
                if let Err(record_err) = recorded {
                    error!(%reference, error = %record_err, "Could not record failed order");
                }
                warn!(%reference, error = %e, uncertain = e.outcome_uncertain(), "Order not acknowledged");
                return Err(CheckoutError::Submission {
                    reference,
                    source: e,
                });
            }
        };

        let stock_sync_failures = self.apply_stock(&order).await;

        if let Err(e) = self.cart.clear().await {
            error!(%reference, error = %e, "Order placed but cart not cleared");
        }
        if let Err(e) = self.orders.confirm(reference, ack.clone()).await {
            error!(%reference, error = %e, "Order placed but not marked confirmed");
        }
        info!(%reference, remote_id = %ack.remote_id, payable = %quote.payable, "Checkout succeeded");

        Ok(CheckoutReceipt {
            reference,
            order,
            ack,
            quote,
            stock_sync_failures,
        })
    }

    /// Decrements local stock for every purchased line, then pushes each
    /// changed product to the service. Returns the products the service did
    /// not accept.
    async fn apply_stock(&self, order: &Order) -> Vec<ProductId> {
        let mut updated = Vec::with_capacity(order.lines.len());
        for line in &order.lines {
            match self
                .catalog
                .decrement_stock(line.product_id, line.quantity)
                .await
            {
                Ok(product) => updated.push(product),
                Err(e) => {
                    warn!(product = %line.product_id, error = %e, "Stock not decremented")
                }
            }
        }

        let mut failures = Vec::new();
        for product in &updated {
            if let Err(e) = with_timeout(self.timeout, self.api.update_product(product)).await {
                warn!(product = %product.id, stock = product.stock, error = %e,
                    "Stock change not pushed to product service");
                failures.push(product.id);
            }
        }
        failures
    }
}
