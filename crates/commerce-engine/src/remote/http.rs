//! JSON-over-HTTP client for the product and order services.

use super::wire::{OrderAckRecord, OrderRequest, OrderResponse, ProductRecord};
use super::{ApiError, CommerceApi};
use crate::model::{Order, OrderAck, Product, ProductId, RemoteOrder, UserId};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

/// HTTP implementation of [`CommerceApi`].
///
/// Endpoints, relative to the base URL:
///
/// | Operation | Request |
/// |---|---|
/// | fetch products | `GET products` |
/// | submit order | `POST orders` |
/// | fetch orders | `GET orders/client/{email}` |
/// | create product | `POST products` |
/// | update product | `PUT products/{id}` |
/// | delete product | `DELETE products/{id}` |
#[derive(Clone)]
pub struct HttpCommerceApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCommerceApi {
    /// Builds a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let response = Self::check_status(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl CommerceApi for HttpCommerceApi {
    #[instrument(skip(self))]
    async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        let response = self.client.get(self.url("products")).send().await?;
        let records: Vec<ProductRecord> = Self::read_json(response).await?;
        debug!(count = records.len(), "Products fetched");
        records.into_iter().map(Product::try_from).collect()
    }

    #[instrument(skip(self, order), fields(client = %order.client_id, total = %order.total))]
    async fn submit_order(&self, order: &Order) -> Result<OrderAck, ApiError> {
        let response = self
            .client
            .post(self.url("orders"))
            .json(&OrderRequest::from(order))
            .send()
            .await?;
        let ack: OrderAckRecord = Self::read_json(response).await?;
        OrderAck::try_from(ack)
    }

    #[instrument(skip(self))]
    async fn fetch_orders(&self, client: &UserId) -> Result<Vec<RemoteOrder>, ApiError> {
        let url = self.url(&format!("orders/client/{client}"));
        let response = self.client.get(url).send().await?;
        let orders: Vec<OrderResponse> = Self::read_json(response).await?;
        orders.into_iter().map(RemoteOrder::try_from).collect()
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn create_product(&self, product: &Product) -> Result<Product, ApiError> {
        let mut record = ProductRecord::from(product);
        record.id = None;
        let response = self
            .client
            .post(self.url("products"))
            .json(&record)
            .send()
            .await?;
        let created: ProductRecord = Self::read_json(response).await?;
        Product::try_from(created)
    }

    #[instrument(skip(self, product), fields(id = %product.id))]
    async fn update_product(&self, product: &Product) -> Result<Product, ApiError> {
        let response = self
            .client
            .put(self.url(&format!("products/{}", product.id.0)))
            .json(&ProductRecord::from(product))
            .send()
            .await?;
        let updated: ProductRecord = Self::read_json(response).await?;
        Product::try_from(updated)
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("products/{}", id.0)))
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }
}
