//! Application state shared across handlers.

use std::sync::Arc;

use clean_girl_core::{CurrencyCode, Price};

use crate::config::StorefrontConfig;
use crate::middleware::SessionLocks;
use crate::order_api::{OrderApiClient, OrderApiError};
use crate::order_flow::OrderFlowController;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Per-visitor state lives in
/// the session; `session_locks` keeps each visitor's requests in order.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    order_api: OrderApiClient,
    session_locks: SessionLocks,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the order API client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, OrderApiError> {
        let order_api = OrderApiClient::new(&config.order_api)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                order_api,
                session_locks: SessionLocks::default(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the order API client.
    #[must_use]
    pub fn order_api(&self) -> &OrderApiClient {
        &self.inner.order_api
    }

    /// Get a reference to the per-session request locks.
    #[must_use]
    pub fn session_locks(&self) -> &SessionLocks {
        &self.inner.session_locks
    }

    /// A fresh controller for a new visitor, at the built-in price.
    #[must_use]
    pub fn new_controller(&self) -> OrderFlowController {
        let api = &self.inner.config.order_api;
        OrderFlowController::new(
            api.product_name.clone(),
            Price::from_cents(api.default_price_cents, CurrencyCode::USD),
        )
    }
}
