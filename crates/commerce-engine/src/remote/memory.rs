//! In-process commerce service for tests and offline runs.

use super::wire::OrderRequest;
use super::{ApiError, CommerceApi};
use crate::model::{Order, OrderAck, Product, ProductId, RemoteOrder, UserId};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// How `submit_order` should misbehave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitFailure {
    /// The connection drops before the service sees the order.
    Transport,
    /// The service refuses the order with a 422.
    Rejected,
    /// The service stores the order, then answers with something unreadable.
    GarbledAck,
}

#[derive(Debug, Default)]
struct State {
    products: BTreeMap<ProductId, Product>,
    orders: Vec<RemoteOrder>,
    requests: Vec<OrderRequest>,
    next_product_id: Option<u64>,
    offline: bool,
    submit_failure: Option<SubmitFailure>,
    fail_product_writes: bool,
    latency: Duration,
    submit_calls: usize,
    product_writes: usize,
}

/// A [`CommerceApi`] that keeps products and orders in memory.
#[derive(Debug, Default)]
pub struct InMemoryCommerceApi {
    state: Mutex<State>,
}

impl InMemoryCommerceApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let api = Self::new();
        api.lock().products = products.into_iter().map(|p| (p.id, p)).collect();
        api
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every call fails with a transport error while set.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    pub fn fail_submissions(&self, failure: Option<SubmitFailure>) {
        self.lock().submit_failure = failure;
    }

    pub fn fail_product_writes(&self, fail: bool) {
        self.lock().fail_product_writes = fail;
    }

    /// Delay applied to every call before it is answered.
    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = latency;
    }

    /// Ids handed out by `create_product` start here instead of at `max + 1`.
    pub fn assign_product_ids_from(&self, first: u64) {
        self.lock().next_product_id = Some(first);
    }

    pub fn submit_calls(&self) -> usize {
        self.lock().submit_calls
    }

    pub fn product_writes(&self) -> usize {
        self.lock().product_writes
    }

    pub fn stored_orders(&self) -> Vec<RemoteOrder> {
        self.lock().orders.clone()
    }

    /// Order bodies as they would have gone over the wire, in arrival order.
    pub fn received_requests(&self) -> Vec<OrderRequest> {
        self.lock().requests.clone()
    }

    pub fn stored_product(&self, id: ProductId) -> Option<Product> {
        self.lock().products.get(&id).cloned()
    }

    async fn enter(&self) -> Result<(), ApiError> {
        let (latency, offline) = {
            let state = self.lock();
            (state.latency, state.offline)
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if offline {
            return Err(ApiError::Transport("connection refused".into()));
        }
        Ok(())
    }

    fn product_write(&self) -> Result<std::sync::MutexGuard<'_, State>, ApiError> {
        let mut state = self.lock();
        state.product_writes += 1;
        if state.fail_product_writes {
            return Err(ApiError::Status {
                status: 503,
                message: "inventory service unavailable".into(),
            });
        }
        Ok(state)
    }
}

#[async_trait]
impl CommerceApi for InMemoryCommerceApi {
    async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        self.enter().await?;
        Ok(self.lock().products.values().cloned().collect())
    }

    async fn submit_order(&self, order: &Order) -> Result<OrderAck, ApiError> {
        self.lock().submit_calls += 1;
        self.enter().await?;

        let mut state = self.lock();
        state.requests.push(OrderRequest::from(order));
        match state.submit_failure {
            Some(SubmitFailure::Transport) => {
                return Err(ApiError::Transport("connection reset by peer".into()))
            }
            Some(SubmitFailure::Rejected) => {
                return Err(ApiError::Status {
                    status: 422,
                    message: "order rejected".into(),
                })
            }
            _ => {}
        }

        let remote_id = format!("ord-{}", state.orders.len() + 1);
        let summary = order
            .lines
            .iter()
            .map(|l| format!("{}x{}", l.quantity, l.product_id.0))
            .collect::<Vec<_>>()
            .join(", ");
        state.orders.push(RemoteOrder {
            id: remote_id.clone(),
            client_id: order.client_id.clone(),
            total: order.total,
            summary,
            status: "PENDING".into(),
        });

        if state.submit_failure == Some(SubmitFailure::GarbledAck) {
            return Err(ApiError::Decode("expected value at line 1 column 1".into()));
        }
        Ok(OrderAck {
            remote_id,
            status: "PENDING".into(),
        })
    }

    async fn fetch_orders(&self, client: &UserId) -> Result<Vec<RemoteOrder>, ApiError> {
        self.enter().await?;
        Ok(self
            .lock()
            .orders
            .iter()
            .filter(|o| &o.client_id == client)
            .cloned()
            .collect())
    }

    async fn create_product(&self, product: &Product) -> Result<Product, ApiError> {
        self.enter().await?;
        let mut state = self.product_write()?;
        let id = match state.next_product_id {
            Some(next) => {
                state.next_product_id = Some(next + 1);
                ProductId(next)
            }
            None => match state.products.keys().next_back() {
                Some(max) => max.next().ok_or_else(|| ApiError::Status {
                    status: 507,
                    message: "no product ids left".into(),
                })?,
                None => ProductId(1),
            },
        };
        let created = Product {
            id,
            ..product.clone()
        };
        state.products.insert(id, created.clone());
        Ok(created)
    }

    async fn update_product(&self, product: &Product) -> Result<Product, ApiError> {
        self.enter().await?;
        let mut state = self.product_write()?;
        if !state.products.contains_key(&product.id) {
            return Err(ApiError::Status {
                status: 404,
                message: format!("{} not found", product.id),
            });
        }
        state.products.insert(product.id, product.clone());
        Ok(product.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.enter().await?;
        let mut state = self.product_write()?;
        match state.products.remove(&id) {
            Some(_) => Ok(()),
            None => Err(ApiError::Status {
                status: 404,
                message: format!("{id} not found"),
            }),
        }
    }
}
