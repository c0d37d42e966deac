//! JSON shapes exchanged with the product and order services.
//!
//! Money travels as JSON numbers. Conversions into model types validate what
//! the service sent and fail with [`ApiError::Decode`] instead of letting a
//! malformed record into the catalog.

use super::ApiError;
use crate::model::{
    Category, ImageRef, Order, OrderAck, OrderLine, Product, ProductId, RemoteOrder, UserId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Status sent with every new order.
pub const NEW_ORDER_STATUS: &str = "PENDING";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub category: String,
}

impl From<&Product> for ProductRecord {
    fn from(product: &Product) -> Self {
        Self {
            id: Some(product.id.0),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            stock: i64::from(product.stock),
            image_url: product.image.as_ref().map(ImageRef::to_wire).unwrap_or_default(),
            category: product.category.to_string(),
        }
    }
}

impl TryFrom<ProductRecord> for Product {
    type Error = ApiError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let id = record
            .id
            .ok_or_else(|| ApiError::Decode(format!("product {:?} has no id", record.name)))?;
        let stock = u32::try_from(record.stock)
            .map_err(|_| ApiError::Decode(format!("product {id} has stock {}", record.stock)))?;
        let product = Product {
            id: ProductId(id),
            name: record.name,
            description: record.description,
            price: record.price,
            stock,
            category: Category::new(&record.category),
            image: ImageRef::parse(&record.image_url),
        };
        product
            .validate()
            .map_err(|e| ApiError::Decode(format!("product {id}: {e}")))?;
        Ok(product)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRecord {
    pub product_id: u64,
    pub quantity: u32,
    #[serde(rename = "unitPriceAtPurchase", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
}

impl From<&OrderLine> for OrderItemRecord {
    fn from(line: &OrderLine) -> Self {
        Self {
            product_id: line.product_id.0,
            quantity: line.quantity,
            unit_price: line.unit_price,
            subtotal: line.subtotal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub client_id: String,
    pub status: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub items: Vec<OrderItemRecord>,
}

impl From<&Order> for OrderRequest {
    fn from(order: &Order) -> Self {
        Self {
            client_id: order.client_id.to_string(),
            status: NEW_ORDER_STATUS.to_string(),
            total: order.total,
            items: order.lines.iter().map(OrderItemRecord::from).collect(),
        }
    }
}

/// Answer to `POST orders`. Only the id is required; services differ in how
/// much of the stored order they echo back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAckRecord {
    pub id: String,
    #[serde(default = "pending_status")]
    pub status: String,
}

fn pending_status() -> String {
    NEW_ORDER_STATUS.to_string()
}

impl TryFrom<OrderAckRecord> for OrderAck {
    type Error = ApiError;

    fn try_from(response: OrderAckRecord) -> Result<Self, Self::Error> {
        if response.id.trim().is_empty() {
            return Err(ApiError::Decode("order acknowledgement has no id".into()));
        }
        Ok(OrderAck {
            remote_id: response.id,
            status: response.status,
        })
    }
}

/// One entry of `GET orders/client/{email}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub client_id: String,
    #[serde(default)]
    pub items_summary: String,
    #[serde(default = "pending_status")]
    pub status: String,
}

impl TryFrom<OrderResponse> for RemoteOrder {
    type Error = ApiError;

    fn try_from(response: OrderResponse) -> Result<Self, Self::Error> {
        let client_id =
            UserId::parse(&response.client_id).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(RemoteOrder {
            id: response.id,
            client_id,
            total: response.total,
            summary: response.items_summary,
            status: response.status,
        })
    }
}
