use crate::admin::InventoryAdmin;
use crate::cart_actor::{CartContext, CartError};
use crate::catalog_actor::LoadError;
use crate::checkout::CheckoutOrchestrator;
use crate::clients::{
    AccountClient, CartClient, CatalogClient, CatalogSource, FavoritesClient, LoyaltyClient,
    OrderClient, RestoredCart,
};
use crate::config::EngineConfig;
use crate::favorites_actor::{FavoritesContext, FavoritesError};
use crate::loyalty_actor::{LoyaltyContext, LoyaltyError};
use crate::model::UserId;
use crate::remote::CommerceApi;
use crate::storage::{FavoriteRepository, KeyValueStore};
use crate::{account_actor, cart_actor, catalog_actor, favorites_actor, loyalty_actor, order_actor};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Catalog load failed: {0}")]
    Catalog(#[from] LoadError),

    #[error("Cart restore failed: {0}")]
    Cart(#[from] CartError),

    #[error("Loyalty restore failed: {0}")]
    Loyalty(#[from] LoyaltyError),

    #[error("Favorites load failed: {0}")]
    Favorites(#[from] FavoritesError),

    #[error("Actor task failed: {0}")]
    Shutdown(String),
}

/// What [`ShopSession::login`] brought back from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginSummary {
    pub points: u64,
    pub favorites: usize,
}

/// Every store of one shopping session, running.
pub struct ShopSession {
    pub catalog: CatalogClient,
    pub cart: CartClient,
    pub favorites: FavoritesClient,
    pub loyalty: LoyaltyClient,
    pub orders: OrderClient,
    pub accounts: AccountClient,
    pub checkout: CheckoutOrchestrator,
    pub admin: InventoryAdmin,
    /// Where the catalog loaded at start came from.
    pub catalog_source: CatalogSource,
    /// How the persisted cart was rebuilt at start.
    pub restored_cart: RestoredCart,
    handles: Vec<JoinHandle<()>>,
}

impl ShopSession {
    /// Spawns every store, loads the catalog and restores the cart.
    ///
    /// An unreachable product service is not an error; the bundled catalog is
    /// used and reported in [`catalog_source`](Self::catalog_source). A stored
    /// cart that cannot be read is logged and the session starts with an
    /// empty cart.
    pub async fn start(
        config: &EngineConfig,
        api: Arc<dyn CommerceApi>,
        kv: Arc<dyn KeyValueStore>,
        favorites_repo: Arc<dyn FavoriteRepository>,
    ) -> Result<Self, SessionError> {
        let buffer = config.actor_buffer;
        let timeout = config.request_timeout;

        // 1. Create actors
        let (catalog_actor, catalog_inner) = catalog_actor::new(buffer);
        let (cart_actor, cart_inner) = cart_actor::new(buffer);
        let (favorites_actor, favorites_inner) = favorites_actor::new(buffer);
        let (loyalty_actor, loyalty_inner) = loyalty_actor::new(buffer);
        let (order_actor, order_inner) = order_actor::new(buffer);
        let (account_actor, account_inner) = account_actor::new(buffer);

        // 2. Start actors with injected context
        let handles = vec![
            tokio::spawn(catalog_actor.run(())),
            tokio::spawn(cart_actor.run(CartContext::new(kv.clone(), config.cart_key.clone()))),
            tokio::spawn(favorites_actor.run(FavoritesContext {
                repo: favorites_repo.clone(),
            })),
            tokio::spawn(loyalty_actor.run(LoyaltyContext { kv: kv.clone() })),
            tokio::spawn(order_actor.run(())),
            tokio::spawn(account_actor.run(())),
        ];

        // 3. Wire clients
        let catalog = CatalogClient::new(catalog_inner, api.clone(), timeout);
        let cart = CartClient::new(cart_inner, catalog.clone());
        let favorites = FavoritesClient::new(favorites_inner, catalog.clone(), favorites_repo);
        let loyalty = LoyaltyClient::new(loyalty_inner, kv.clone());
        let orders = OrderClient::new(order_inner, api.clone(), timeout);
        let accounts = AccountClient::new(account_inner);
        let checkout = CheckoutOrchestrator::new(
            cart.clone(),
            catalog.clone(),
            orders.clone(),
            loyalty.clone(),
            api.clone(),
            timeout,
        );
        let admin = InventoryAdmin::new(
            catalog.clone(),
            cart.clone(),
            api,
            timeout,
            config.low_stock_threshold,
        );

        // 4. Load state
        let loaded = catalog.load_detailed().await?;
        let restored_cart = Self::restore_cart(&cart, kv.as_ref(), &config.cart_key).await?;
        info!(
            products = loaded.products.len(),
            remote = loaded.source == CatalogSource::Remote,
            cart_lines = restored_cart.restored,
            "Session started"
        );

        Ok(Self {
            catalog,
            cart,
            favorites,
            loyalty,
            orders,
            accounts,
            checkout,
            admin,
            catalog_source: loaded.source,
            restored_cart,
            handles,
        })
    }

    async fn restore_cart(
        cart: &CartClient,
        kv: &dyn KeyValueStore,
        key: &str,
    ) -> Result<RestoredCart, SessionError> {
        let raw = match kv.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(RestoredCart::default()),
            Err(e) => {
                warn!(error = %e, "Stored cart unavailable; starting empty");
                return Ok(RestoredCart::default());
            }
        };
        match cart.restore(&raw).await {
            Ok(restored) => Ok(restored),
            Err(CartError::Codec(e)) => {
                warn!(error = %e, "Stored cart unreadable; starting empty");
                Ok(RestoredCart::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Brings a user's loyalty balance and favorites into the session.
    pub async fn login(&self, user: &UserId) -> Result<LoginSummary, SessionError> {
        let points = self.loyalty.restore(user).await?;
        let favorites = self.favorites.load(user).await?;
        info!(%user, points, favorites, "User logged in");
        Ok(LoginSummary { points, favorites })
    }

    /// Clears the local reflection of the user's favorites. Stored rows stay.
    pub async fn logout(&self, user: &UserId) -> Result<(), SessionError> {
        self.favorites.forget(user).await?;
        info!(%user, "User logged out");
        Ok(())
    }

    /// Drops every client and waits for the actors to stop.
    ///
    /// A checkout still submitting in the background keeps the stores it
    /// touches alive until it finishes.
    pub async fn shutdown(self) -> Result<(), SessionError> {
        info!("Shutting down session...");

        let Self {
            catalog,
            cart,
            favorites,
            loyalty,
            orders,
            accounts,
            checkout,
            admin,
            handles,
            ..
        } = self;
        drop((catalog, cart, favorites, loyalty, orders, accounts, checkout, admin));

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SessionError::Shutdown(e.to_string()));
            }
        }

        info!("Session shutdown complete.");
        Ok(())
    }
}
