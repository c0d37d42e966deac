mod common;

use commerce_actor::ActorClient;
use commerce_engine::admin::AdminError;
use commerce_engine::model::{Category, ProductDraft, ProductId};
use commerce_engine::remote::ApiError;
use common::{product, Harness};
use rust_decimal_macros::dec;

async fn shop() -> Harness {
    Harness::start(vec![
        product(1, "PlayStation 5", dec!(100), 10),
        product(2, "Gaming Headset", dec!(50), 3),
    ])
    .await
}

fn draft(name: &str) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        description: "Wireless".to_string(),
        price: dec!(79.99),
        stock: 4,
        category: Category::phones(),
        image: None,
    }
}

#[tokio::test]
async fn test_failed_update_restores_entry_exactly() {
    let h = shop().await;
    let before = h.session.catalog.get(ProductId(1)).await.unwrap().unwrap();
    h.api.fail_product_writes(true);

    let mut edited = before.clone();
    edited.price = dec!(120);
    edited.name = "PlayStation 5 Pro".to_string();
    let err = h.session.admin.update(edited).await.unwrap_err();

    assert!(matches!(
        err,
        AdminError::RolledBack {
            operation: "update",
            source: ApiError::Status { status: 503, .. }
        }
    ));
    let after = h.session.catalog.get(ProductId(1)).await.unwrap().unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_update_reprices_cart() {
    let h = shop().await;
    let ps5 = h.session.catalog.get(ProductId(1)).await.unwrap().unwrap();
    h.session.cart.add(&ps5, 2).await.unwrap();
    assert_eq!(h.session.cart.total().await.unwrap(), dec!(200));

    let mut edited = ps5.clone();
    edited.price = dec!(90);
    h.session.admin.update(edited).await.unwrap();

    assert_eq!(h.session.cart.total().await.unwrap(), dec!(180));
    assert_eq!(h.api.stored_product(ProductId(1)).unwrap().price, dec!(90));
}

#[tokio::test]
async fn test_create_adopts_service_id() {
    let h = shop().await;
    h.api.assign_product_ids_from(100);

    let created = h.session.admin.create(draft("Pixel Buds")).await.unwrap();

    assert_eq!(created.id, ProductId(100));
    assert!(h.session.catalog.get(ProductId(3)).await.unwrap().is_none());
    assert_eq!(
        h.session.catalog.get(ProductId(100)).await.unwrap(),
        Some(created)
    );
    assert_eq!(h.session.catalog.list().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_create_keeps_matching_local_id() {
    let h = shop().await;
    let created = h.session.admin.create(draft("Pixel Buds")).await.unwrap();
    assert_eq!(created.id, ProductId(3));
    assert_eq!(h.api.stored_product(ProductId(3)).unwrap().name, "Pixel Buds");
}

#[tokio::test]
async fn test_failed_create_removes_provisional_entry() {
    let h = shop().await;
    h.api.fail_product_writes(true);

    let err = h.session.admin.create(draft("Pixel Buds")).await.unwrap_err();

    assert!(matches!(err, AdminError::RolledBack { operation: "create", .. }));
    let ids: Vec<ProductId> = h
        .session
        .catalog
        .list()
        .await
        .unwrap()
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![ProductId(1), ProductId(2)]);
}

#[tokio::test]
async fn test_invalid_draft_rejected_before_any_write() {
    let h = shop().await;
    let mut bad = draft("Pixel Buds");
    bad.price = dec!(-1);

    let err = h.session.admin.create(bad).await.unwrap_err();

    assert!(matches!(err, AdminError::Invalid(_)));
    assert_eq!(h.api.product_writes(), 0);
    assert_eq!(h.session.catalog.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_with_no_ids_left_keeps_catalog_running() {
    let h = shop().await;
    h.session
        .catalog
        .put(product(u64::MAX, "Collector Console", dec!(999), 1))
        .await
        .unwrap();

    let err = h.session.admin.create(draft("Pixel Buds")).await.unwrap_err();

    assert_eq!(err, AdminError::IdsExhausted);
    assert_eq!(h.api.product_writes(), 0);
    assert_eq!(h.session.catalog.list().await.unwrap().len(), 3);
    assert!(h.session.catalog.get(ProductId(1)).await.unwrap().is_some());
}

#[tokio::test]
async fn test_failed_delete_restores_entry() {
    let h = shop().await;
    let before = h.session.catalog.get(ProductId(2)).await.unwrap().unwrap();
    h.api.fail_product_writes(true);

    let err = h.session.admin.delete(ProductId(2)).await.unwrap_err();

    assert!(matches!(err, AdminError::RolledBack { operation: "delete", .. }));
    assert_eq!(
        h.session.catalog.get(ProductId(2)).await.unwrap(),
        Some(before)
    );
}

#[tokio::test]
async fn test_delete_product_in_cart_is_allowed() {
    let h = shop().await;
    let headset = h.session.catalog.get(ProductId(2)).await.unwrap().unwrap();
    h.session.cart.add(&headset, 1).await.unwrap();

    h.session.admin.delete(ProductId(2)).await.unwrap();

    assert!(h.session.catalog.get(ProductId(2)).await.unwrap().is_none());
    assert!(h.api.stored_product(ProductId(2)).is_none());
    // The line stays, but no longer counts toward the total
    assert_eq!(h.session.cart.list().await.unwrap().len(), 1);
    assert_eq!(h.session.cart.total().await.unwrap(), dec!(0));
}

#[tokio::test]
async fn test_delete_unknown_product() {
    let h = shop().await;
    let err = h.session.admin.delete(ProductId(42)).await.unwrap_err();
    assert_eq!(err, AdminError::NotFound(ProductId(42)));
    assert_eq!(h.api.product_writes(), 0);
}

#[tokio::test]
async fn test_low_stock_uses_configured_threshold() {
    let h = shop().await;
    let low = h.session.admin.low_stock().await.unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].id, ProductId(2));
}
