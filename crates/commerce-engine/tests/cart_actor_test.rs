mod common;

use commerce_actor::mock::MockClient;
use commerce_actor::ActorClient;
use commerce_engine::cart_actor::{self, CartContext, CartError};
use commerce_engine::clients::{CartClient, CatalogClient};
use commerce_engine::model::{Product, ProductId};
use commerce_engine::remote::InMemoryCommerceApi;
use commerce_engine::storage::MemoryKeyValueStore;
use common::product;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

/// Real cart actor with a mocked catalog.
/// Exercises cart validation and persistence without a running catalog actor.
#[tokio::test]
async fn test_cart_actor_with_mocked_catalog() {
    let ps5 = product(1, "PlayStation 5", dec!(100), 5);

    let mut catalog_mock = MockClient::<Product>::new();
    catalog_mock.expect_get(ProductId(1)).return_ok(Some(ps5.clone()));
    catalog_mock.expect_get(ProductId(1)).return_ok(Some(ps5.clone()));
    catalog_mock.expect_get(ProductId(9)).return_ok(None);
    let mut repriced = ps5.clone();
    repriced.price = dec!(80);
    catalog_mock.expect_list().return_ok(vec![repriced]);

    let catalog = CatalogClient::new(
        catalog_mock.client(),
        Arc::new(InMemoryCommerceApi::new()),
        Duration::from_secs(1),
    );

    let kv = Arc::new(MemoryKeyValueStore::new());
    let (actor, inner) = cart_actor::new(8);
    let handle = tokio::spawn(actor.run(CartContext::new(kv.clone(), "test-cart")));
    let cart = CartClient::new(inner, catalog);

    assert_eq!(cart.add(&ps5, 2).await.unwrap(), 2);
    assert_eq!(cart.add(&ps5, 1).await.unwrap(), 3);
    assert_eq!(kv.peek("test-cart").as_deref(), Some("v1:1,3"));

    let ghost = product(9, "Discontinued", dec!(10), 1);
    assert_eq!(
        cart.add(&ghost, 1).await.unwrap_err(),
        CartError::UnknownProduct(ProductId(9))
    );

    // Totals use whatever the catalog says now
    assert_eq!(cart.total().await.unwrap(), dec!(240));

    catalog_mock.verify();

    drop(cart);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_cart_reports_closed_catalog() {
    let ps5 = product(1, "PlayStation 5", dec!(100), 5);
    let mut catalog_mock = MockClient::<Product>::new();
    catalog_mock
        .expect_get(ProductId(1))
        .return_err(commerce_actor::FrameworkError::ActorClosed);

    let catalog = CatalogClient::new(
        catalog_mock.client(),
        Arc::new(InMemoryCommerceApi::new()),
        Duration::from_secs(1),
    );
    let (actor, inner) = cart_actor::new(8);
    let handle = tokio::spawn(actor.run(CartContext::new(Arc::new(MemoryKeyValueStore::new()), "cart")));
    let cart = CartClient::new(inner, catalog);

    assert!(matches!(cart.add(&ps5, 1).await, Err(CartError::Catalog(_))));
    assert!(cart.list().await.unwrap().is_empty());

    drop(cart);
    handle.await.unwrap();
}
