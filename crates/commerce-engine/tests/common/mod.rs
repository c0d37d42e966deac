#![allow(dead_code)]

use commerce_engine::config::EngineConfig;
use commerce_engine::lifecycle::ShopSession;
use commerce_engine::model::{Category, Product, ProductId, UserId};
use commerce_engine::remote::InMemoryCommerceApi;
use commerce_engine::storage::{MemoryFavoriteRepository, MemoryKeyValueStore};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

pub fn product(id: u64, name: &str, price: Decimal, stock: u32) -> Product {
    Product {
        id: ProductId(id),
        name: name.to_string(),
        description: String::new(),
        price,
        stock,
        category: Category::gaming(),
        image: None,
    }
}

pub fn user(email: &str) -> UserId {
    UserId::parse(email).expect("valid email")
}

pub fn config() -> EngineConfig {
    EngineConfig {
        request_timeout: Duration::from_millis(250),
        ..EngineConfig::default()
    }
}

/// A running session plus handles on its in-memory collaborators.
pub struct Harness {
    pub session: ShopSession,
    pub api: Arc<InMemoryCommerceApi>,
    pub kv: Arc<MemoryKeyValueStore>,
    pub repo: Arc<MemoryFavoriteRepository>,
}

impl Harness {
    pub async fn start(products: Vec<Product>) -> Self {
        let api = Arc::new(InMemoryCommerceApi::with_products(products));
        Self::start_with(api, Arc::new(MemoryKeyValueStore::new()), Arc::new(MemoryFavoriteRepository::new())).await
    }

    pub async fn start_with(
        api: Arc<InMemoryCommerceApi>,
        kv: Arc<MemoryKeyValueStore>,
        repo: Arc<MemoryFavoriteRepository>,
    ) -> Self {
        let session = ShopSession::start(&config(), api.clone(), kv.clone(), repo.clone())
            .await
            .expect("session starts");
        Self {
            session,
            api,
            kv,
            repo,
        }
    }
}
