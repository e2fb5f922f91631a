//! Application state shared across handlers.

use std::sync::Arc;

use meridian_client::{AuthTokens, Client, ClientConfig};

use crate::config::StorefrontConfig;
use crate::services::{CatalogCache, RazorpayGateway};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration, the cached catalog reader, and the payment gateway
/// helper. Authenticated API clients are built per request from session
/// tokens (see `middleware::ApiContext`).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    client_config: ClientConfig,
    catalog: CatalogCache,
    razorpay: RazorpayGateway,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let client_config = ClientConfig::new(config.api_base_url.clone());
        let catalog = CatalogCache::new(Client::new(client_config.clone()));
        let razorpay = RazorpayGateway::new(&config.razorpay);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                client_config,
                catalog,
                razorpay,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the cached catalog reader.
    #[must_use]
    pub fn catalog(&self) -> &CatalogCache {
        &self.inner.catalog
    }

    /// Get a reference to the Razorpay gateway helper.
    #[must_use]
    pub fn razorpay(&self) -> &RazorpayGateway {
        &self.inner.razorpay
    }

    /// Build an API client for the current request, holding the token
    /// pair restored from the session (if any).
    #[must_use]
    pub fn api_client(&self, tokens: Option<AuthTokens>) -> Client {
        match tokens {
            Some(tokens) => Client::with_tokens(self.inner.client_config.clone(), tokens),
            None => Client::new(self.inner.client_config.clone()),
        }
    }
}
