//! Application state shared across handlers.

use std::sync::Arc;

use delights_core::{CatalogProvider, CurrencyCode, StaticCatalog};

use crate::config::StorefrontConfig;
use crate::services::{CartStore, KitchenClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, the session carts and the kitchen.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<dyn CatalogProvider>,
    carts: CartStore,
    kitchen: KitchenClient,
}

impl AppState {
    /// Create state serving the house menu.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        Self::with_catalog(config, Arc::new(StaticCatalog::house_menu()))
    }

    /// Create state serving an arbitrary catalog.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: Arc<dyn CatalogProvider>) -> Self {
        let currency_code = catalog
            .items()
            .first()
            .map_or_else(CurrencyCode::default, |item| item.price.currency_code);
        let carts = CartStore::new(config.cart_idle_timeout, currency_code);
        let kitchen = KitchenClient::new(&config.kitchen);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                carts,
                kitchen,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the menu.
    #[must_use]
    pub fn catalog(&self) -> &dyn CatalogProvider {
        self.inner.catalog.as_ref()
    }

    /// Get the session cart store.
    #[must_use]
    pub fn carts(&self) -> &CartStore {
        &self.inner.carts
    }

    /// Get the kitchen client.
    #[must_use]
    pub fn kitchen(&self) -> &KitchenClient {
        &self.inner.kitchen
    }
}
