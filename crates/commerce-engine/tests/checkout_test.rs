mod common;

use commerce_actor::ActorClient;
use commerce_engine::checkout::{CheckoutError, CheckoutState};
use commerce_engine::model::{OrderStatus, ProductId};
use commerce_engine::remote::memory::SubmitFailure;
use commerce_engine::remote::ApiError;
use common::{product, user, Harness};
use rust_decimal_macros::dec;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

async fn shop_with_cart() -> Harness {
    let harness = Harness::start(vec![
        product(1, "PlayStation 5", dec!(100), 5),
        product(2, "Gaming Headset", dec!(50), 1),
    ])
    .await;
    let catalog = harness.session.catalog.list().await.unwrap();
    harness.session.cart.add(&catalog[0], 2).await.unwrap();
    harness.session.cart.add(&catalog[1], 3).await.unwrap();
    harness
}

#[tokio::test]
async fn test_checkout_success_applies_outcome() {
    let h = shop_with_cart().await;
    let alice = user("alice@shop.test");

    let receipt = h.session.checkout.checkout(&alice).await.unwrap();

    assert_eq!(receipt.order.total, dec!(350));
    assert_eq!(receipt.order.lines[0].unit_price, dec!(100));
    assert_eq!(receipt.order.lines[1].subtotal, dec!(150));
    assert!(receipt.stock_sync_failures.is_empty());

    // Stock decremented, floored at zero, and pushed to the service
    assert_eq!(h.session.catalog.check_stock(ProductId(1)).await.unwrap(), 3);
    assert_eq!(h.session.catalog.check_stock(ProductId(2)).await.unwrap(), 0);
    assert_eq!(h.api.stored_product(ProductId(1)).unwrap().stock, 3);
    assert_eq!(h.api.stored_product(ProductId(2)).unwrap().stock, 0);

    assert!(h.session.cart.is_empty().await.unwrap());
    assert_eq!(h.kv.peek("cart").as_deref(), Some("v1:"));

    assert_eq!(
        h.session.checkout.state(),
        CheckoutState::Succeeded {
            reference: receipt.reference,
            remote_id: receipt.ack.remote_id.clone(),
        }
    );

    let history = h.session.orders.history(&alice).await.unwrap();
    assert_eq!(history.remote.len(), 1);
    assert_eq!(history.remote[0].total, dec!(350));
    assert!(history.unconfirmed.is_empty());

    h.session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_checkout_charges_current_catalog_price() {
    let h = shop_with_cart().await;
    let alice = user("alice@shop.test");

    let mut ps5 = h.session.catalog.get(ProductId(1)).await.unwrap().unwrap();
    ps5.price = dec!(80);
    h.session.admin.update(ps5).await.unwrap();

    let receipt = h.session.checkout.checkout(&alice).await.unwrap();

    assert_eq!(receipt.order.lines[0].unit_price, dec!(80));
    assert_eq!(receipt.order.lines[0].subtotal, dec!(160));
    assert_eq!(receipt.order.total, dec!(310));

    let sent = h.api.received_requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].items[0].unit_price, dec!(80));
    assert_eq!(sent[0].total, dec!(310));
    let body = serde_json::to_value(&sent[0]).unwrap();
    assert_eq!(body["items"][0]["unitPriceAtPurchase"], serde_json::json!(80.0));
}

#[tokio::test]
async fn test_transport_failure_leaves_cart_and_stock() {
    let h = shop_with_cart().await;
    let alice = user("alice@shop.test");
    h.api.fail_submissions(Some(SubmitFailure::Transport));

    let err = h.session.checkout.checkout(&alice).await.unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::Submission {
            source: ApiError::Transport(_),
            ..
        }
    ));
    assert!(err.is_retryable());
    assert!(err.outcome_uncertain());

    assert_eq!(h.session.cart.list().await.unwrap().len(), 2);
    assert_eq!(h.session.cart.total().await.unwrap(), dec!(350));
    assert_eq!(h.session.catalog.check_stock(ProductId(1)).await.unwrap(), 5);
    assert_eq!(h.session.catalog.check_stock(ProductId(2)).await.unwrap(), 1);
    assert!(matches!(h.session.checkout.state(), CheckoutState::Failed { reference: Some(_), .. }));

    let history = h.session.orders.history(&alice).await.unwrap();
    assert!(history.remote.is_empty());
    assert_eq!(history.unconfirmed.len(), 1);
    assert!(matches!(history.unconfirmed[0].status, OrderStatus::Uncertain { .. }));

    // A retry after the service recovers goes through
    h.api.fail_submissions(None);
    h.session.checkout.checkout(&alice).await.unwrap();
    assert!(h.session.cart.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_empty_cart_never_calls_service() {
    let h = Harness::start(vec![product(1, "PlayStation 5", dec!(100), 5)]).await;

    let err = h
        .session
        .checkout
        .checkout(&user("alice@shop.test"))
        .await
        .unwrap_err();

    assert_eq!(err, CheckoutError::EmptyCart);
    assert_eq!(h.api.submit_calls(), 0);
    assert_eq!(h.session.checkout.state(), CheckoutState::Idle);
}

#[tokio::test]
async fn test_second_checkout_rejected_while_submitting() {
    let h = shop_with_cart().await;
    let alice = user("alice@shop.test");
    h.api.set_latency(Duration::from_millis(100));

    let mut state = h.session.checkout.subscribe();
    let first = {
        let checkout = h.session.checkout.clone();
        let alice = alice.clone();
        tokio::spawn(async move { checkout.checkout(&alice).await })
    };
    state
        .wait_for(|s| *s == CheckoutState::Submitting)
        .await
        .unwrap();

    let second = h.session.checkout.checkout(&alice).await;
    assert_eq!(second.unwrap_err(), CheckoutError::InProgress);

    first.await.unwrap().unwrap();
    assert_eq!(h.api.submit_calls(), 1);
}

#[tokio::test]
async fn test_checkout_on_emptied_cart_while_submitting_is_in_progress() {
    let h = shop_with_cart().await;
    let alice = user("alice@shop.test");
    h.api.set_latency(Duration::from_millis(100));

    let mut state = h.session.checkout.subscribe();
    let first = {
        let checkout = h.session.checkout.clone();
        let alice = alice.clone();
        tokio::spawn(async move { checkout.checkout(&alice).await })
    };
    state
        .wait_for(|s| *s == CheckoutState::Submitting)
        .await
        .unwrap();
    h.session.cart.clear().await.unwrap();

    let second = h.session.checkout.checkout(&alice).await;
    assert_eq!(second.unwrap_err(), CheckoutError::InProgress);

    first.await.unwrap().unwrap();
    assert_eq!(h.api.submit_calls(), 1);
}

#[tokio::test]
async fn test_garbled_ack_is_uncertain() {
    let h = shop_with_cart().await;
    let alice = user("alice@shop.test");
    h.api.fail_submissions(Some(SubmitFailure::GarbledAck));

    let err = h.session.checkout.checkout(&alice).await.unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::Submission {
            source: ApiError::Decode(_),
            ..
        }
    ));
    assert!(err.outcome_uncertain());

    // The service kept the order, the client cannot tell, and both show up
    let history = h.session.orders.history(&alice).await.unwrap();
    assert_eq!(history.remote.len(), 1);
    assert_eq!(history.unconfirmed.len(), 1);
    assert_eq!(h.session.cart.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_rejected_order_is_not_retryable() {
    let h = shop_with_cart().await;
    let alice = user("alice@shop.test");
    h.api.fail_submissions(Some(SubmitFailure::Rejected));

    let err = h.session.checkout.checkout(&alice).await.unwrap_err();
    assert!(!err.is_retryable());
    assert!(!err.outcome_uncertain());

    let records = h.session.orders.local_orders(&alice).await.unwrap();
    assert!(matches!(records[0].status, OrderStatus::Rejected { .. }));
}

#[tokio::test]
async fn test_timeout_takes_failure_path() {
    let h = shop_with_cart().await;
    h.api.set_latency(Duration::from_millis(600));

    let err = h
        .session
        .checkout
        .checkout(&user("alice@shop.test"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::Submission {
            source: ApiError::Timeout(_),
            ..
        }
    ));
    assert!(err.is_retryable());
    assert_eq!(h.session.cart.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_abandoned_checkout_still_completes() {
    let h = shop_with_cart().await;
    let alice = user("alice@shop.test");
    h.api.set_latency(Duration::from_millis(50));

    let token = CancellationToken::new();
    token.cancel();
    let err = h
        .session
        .checkout
        .checkout_until_cancelled(&alice, &token)
        .await
        .unwrap_err();
    assert_eq!(err, CheckoutError::Abandoned);

    let mut state = h.session.checkout.subscribe();
    state
        .wait_for(|s| matches!(s, CheckoutState::Succeeded { .. }))
        .await
        .unwrap();

    assert!(h.session.cart.is_empty().await.unwrap());
    assert_eq!(h.session.catalog.check_stock(ProductId(1)).await.unwrap(), 3);
}

#[tokio::test]
async fn test_stock_push_failure_is_reported_not_fatal() {
    let h = shop_with_cart().await;
    h.api.fail_product_writes(true);

    let receipt = h
        .session
        .checkout
        .checkout(&user("alice@shop.test"))
        .await
        .unwrap();

    assert_eq!(receipt.stock_sync_failures, vec![ProductId(1), ProductId(2)]);
    assert_eq!(h.session.catalog.check_stock(ProductId(1)).await.unwrap(), 3);
    assert!(h.session.cart.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_quote_applies_loyalty_discount() {
    let h = Harness::start(vec![product(1, "PlayStation 5", dec!(49990), 5)]).await;
    let alice = user("alice@shop.test");
    let ps5 = h.session.catalog.get(ProductId(1)).await.unwrap().unwrap();
    h.session.cart.add(&ps5, 1).await.unwrap();

    assert_eq!(h.session.loyalty.record_activity(&alice, 4).await.unwrap(), 100);

    let quote = h.session.checkout.quote(&alice).await.unwrap();
    assert_eq!(quote.subtotal, dec!(49990));
    assert_eq!(quote.discount_percent, dec!(0.09));
    assert_eq!(quote.payable, dec!(49945.01));

    let receipt = h.session.checkout.checkout(&alice).await.unwrap();
    assert_eq!(receipt.order.total, dec!(49990));
    assert_eq!(receipt.quote, quote);
}
