//! Application state shared across the presentation layer.

use std::sync::Arc;

use crate::cart::{CartCountSignal, CartService, FileCartStore};
use crate::catalog::{CatalogClient, CatalogError};
use crate::config::AppConfig;
use crate::session::SessionStore;

/// Application state shared across all screens.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog client, the persistent stores, and the cart count broadcast.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    catalog: CatalogClient,
    cart_store: FileCartStore,
    sessions: SessionStore,
    cart_count: CartCountSignal,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: AppConfig) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config)?;
        let cart_store = FileCartStore::new(&config.data_dir);
        let sessions = SessionStore::new(&config.data_dir);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart_store,
                sessions,
                cart_count: CartCountSignal::new(),
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the persistent cart store.
    #[must_use]
    pub fn cart_store(&self) -> &FileCartStore {
        &self.inner.cart_store
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Get a reference to the cart count broadcast.
    #[must_use]
    pub fn cart_count(&self) -> &CartCountSignal {
        &self.inner.cart_count
    }

    /// Build a reconciliation service for one cart screen visit.
    ///
    /// The service gets its own clones of the store and client but shares the
    /// process-wide count broadcast.
    #[must_use]
    pub fn cart_service(&self) -> CartService<FileCartStore, CatalogClient> {
        CartService::new(
            self.inner.cart_store.clone(),
            self.inner.catalog.clone(),
            self.inner.cart_count.clone(),
        )
    }
}
