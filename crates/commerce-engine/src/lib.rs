//! # Commerce Engine
//!
//! Client-side state for a small shop: product catalog, cart, favorites,
//! loyalty points, checkout and inventory administration.
//!
//! ## Core Components
//!
//! - **[model]**: plain data: [`Product`](model::Product), [`CartLine`](model::CartLine), [`Order`](model::Order), [`UserId`](model::UserId) and friends.
//! - **Store actors**: [`catalog_actor`], [`cart_actor`], [`favorites_actor`], [`loyalty_actor`], [`order_actor`], [`account_actor`]. Each implements [`ActorEntity`](commerce_actor::ActorEntity) for its entry type.
//! - **[clients]**: typed wrappers around each store's [`ResourceClient`](commerce_actor::ResourceClient).
//! - **[checkout]** and **[admin]**: workflows spanning several stores and the remote service.
//! - **[remote]** and **[storage]**: the collaborators the engine depends on, behind traits.
//! - **[lifecycle]**: [`ShopSession`](lifecycle::ShopSession), which starts and stops everything.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use commerce_engine::config::EngineConfig;
//! use commerce_engine::lifecycle::ShopSession;
//! use commerce_engine::remote::InMemoryCommerceApi;
//! use commerce_engine::storage::{MemoryFavoriteRepository, MemoryKeyValueStore};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let session = ShopSession::start(
//!     &EngineConfig::default(),
//!     Arc::new(InMemoryCommerceApi::new()),
//!     Arc::new(MemoryKeyValueStore::new()),
//!     Arc::new(MemoryFavoriteRepository::new()),
//! )
//! .await?;
//! println!("cart total: {}", session.cart.total().await?);
//! session.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod account_actor;
pub mod admin;
pub mod cart_actor;
pub mod catalog_actor;
pub mod checkout;
pub mod clients;
pub mod config;
pub mod favorites_actor;
pub mod lifecycle;
pub mod loyalty_actor;
pub mod model;
pub mod order_actor;
pub mod remote;
pub mod storage;
