use commerce_actor::tracing::setup_tracing;
use commerce_actor::ActorClient;
use commerce_engine::catalog_actor::fallback_catalog;
use commerce_engine::config::EngineConfig;
use commerce_engine::lifecycle::ShopSession;
use commerce_engine::model::ProductId;
use commerce_engine::remote::{CommerceApi, HttpCommerceApi, InMemoryCommerceApi};
use commerce_engine::storage::{
    FileKeyValueStore, KeyValueStore, MemoryFavoriteRepository, MemoryKeyValueStore,
};
use std::sync::Arc;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = EngineConfig::from_env().map_err(|e| e.to_string())?;
    info!(?config, "Starting commerce engine");

    let api: Arc<dyn CommerceApi> = match &config.api_base_url {
        Some(url) => Arc::new(
            HttpCommerceApi::new(url.clone(), config.request_timeout).map_err(|e| e.to_string())?,
        ),
        None => {
            info!("No product service configured; running offline");
            Arc::new(InMemoryCommerceApi::with_products(fallback_catalog()))
        }
    };
    let kv: Arc<dyn KeyValueStore> = match &config.state_file {
        Some(path) => Arc::new(FileKeyValueStore::new(path)),
        None => Arc::new(MemoryKeyValueStore::new()),
    };

    let session = ShopSession::start(&config, api, kv, Arc::new(MemoryFavoriteRepository::new()))
        .await
        .map_err(|e| e.to_string())?;

    let user = session
        .accounts
        .register("Alice@Example.com", "Alice")
        .await
        .map_err(|e| e.to_string())?;
    session.login(&user).await.map_err(|e| e.to_string())?;

    let span = tracing::info_span!("shopping", %user);
    async {
        let products = session.catalog.list().await.map_err(|e| e.to_string())?;
        for product in products.iter().take(2) {
            session.cart.add(product, 2).await.map_err(|e| e.to_string())?;
        }
        session
            .favorites
            .toggle(&user, ProductId(1))
            .await
            .map_err(|e| e.to_string())?;
        session
            .loyalty
            .record_activity(&user, 4)
            .await
            .map_err(|e| e.to_string())?;

        let quote = session.checkout.quote(&user).await.map_err(|e| e.to_string())?;
        info!(subtotal = %quote.subtotal, discount = %quote.discount, payable = %quote.payable, "Quote");
        Ok::<(), String>(())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("checkout", %user);
    match session.checkout.checkout(&user).instrument(span).await {
        Ok(receipt) => info!(
            reference = %receipt.reference,
            remote_id = %receipt.ack.remote_id,
            payable = %receipt.quote.payable,
            "Order placed"
        ),
        Err(e) => error!(error = %e, retryable = e.is_retryable(), "Checkout failed"),
    }

    match session.orders.history(&user).await {
        Ok(history) => info!(
            remote = history.remote.len(),
            unconfirmed = history.unconfirmed.len(),
            "Order history"
        ),
        Err(e) => error!(error = %e, "Order history unavailable"),
    }

    let low = session.admin.low_stock().await.map_err(|e| e.to_string())?;
    for product in &low {
        info!(id = %product.id, name = %product.name, stock = product.stock, "Low stock");
    }

    session.logout(&user).await.map_err(|e| e.to_string())?;
    session.shutdown().await.map_err(|e| e.to_string())?;

    info!("Application completed successfully");
    Ok(())
}
