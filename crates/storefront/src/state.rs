//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::catalog::{CatalogClient, CatalogError, LoadedCatalog};
use crate::checkout::{CheckoutCoordinator, OrderClient, OrderSinkError, WhatsAppHandoff};
use crate::config::StorefrontConfig;
use crate::services::{RecommendationError, Recommender};
use crate::shop::ShopSession;

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("catalog client: {0}")]
    Catalog(#[from] CatalogError),
    #[error("order client: {0}")]
    Orders(#[from] OrderSinkError),
    #[error("recommendation client: {0}")]
    Recommendation(#[from] RecommendationError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The shopping session sits
/// behind a single async mutex; each handler locks it for the duration of
/// one cart operation.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    session: Mutex<ShopSession>,
    checkout: CheckoutCoordinator<OrderClient>,
    recommender: Recommender,
}

impl AppState {
    /// Create application state around an already loaded catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client fails to build.
    pub fn new(config: StorefrontConfig, catalog: LoadedCatalog) -> Result<Self, StateError> {
        let orders = OrderClient::new(&config)?;
        let handoff = WhatsAppHandoff::new(config.whatsapp_number.clone(), config.store_name.clone());
        let recommender = Recommender::new(&config.gemini)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                session: Mutex::new(ShopSession::new(catalog)),
                checkout: CheckoutCoordinator::new(orders, handoff),
                recommender,
                config,
            }),
        })
    }

    /// Load the catalog (falling back if needed) and build the state.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client fails to build. An unreachable
    /// catalog endpoint is not an error.
    pub async fn bootstrap(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog = CatalogClient::new(&config)?.load().await;
        Self::new(config, catalog)
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The shopping session.
    #[must_use]
    pub fn session(&self) -> &Mutex<ShopSession> {
        &self.inner.session
    }

    #[must_use]
    pub fn checkout(&self) -> &CheckoutCoordinator<OrderClient> {
        &self.inner.checkout
    }

    #[must_use]
    pub fn recommender(&self) -> &Recommender {
        &self.inner.recommender
    }
}
