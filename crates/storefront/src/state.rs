//! Application state shared across handlers.

use std::sync::Arc;

use vitrina_core::{Catalog, OrderComposer};

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The catalog is loaded once
/// before the server starts and is read-only afterwards; carts live in the
/// per-session store, not here.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    composer: OrderComposer,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - The loaded catalog (empty if loading failed)
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        let composer = config.order.composer();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                composer,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the order composer.
    #[must_use]
    pub fn composer(&self) -> &OrderComposer {
        &self.inner.composer
    }
}
