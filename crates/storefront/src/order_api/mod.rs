//! Client for the remote order-processing API.
//!
//! The storefront does not own order processing. It consumes three
//! endpoints of an external service:
//!
//! ```text
//! GET  {base}/inventory  - product list with list and discount prices
//! POST {base}/order      - place an order, returns `{order_id}` or `{error}`
//! GET  {base}/health     - liveness probe (logged only)
//! ```
//!
//! [`OrderApi`] is the seam the order flow runtime talks to;
//! [`OrderApiClient`] is the `reqwest` implementation.

mod client;
pub mod types;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use clean_girl_core::OrderDraft;
use thiserror::Error;

pub use client::OrderApiClient;
pub use types::{ErrorBody, InventoryProduct, OrderCreated};

/// Shown when the API rejected an order without saying why.
pub const REJECTED_FALLBACK_MESSAGE: &str = "Failed to place order";

/// Shown when the API could not be reached or answered garbage.
pub const TRANSPORT_FALLBACK_MESSAGE: &str = "Failed to place order. Please try again.";

/// Errors that can occur when talking to the order API.
#[derive(Debug, Error)]
pub enum OrderApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with a non-success status.
    #[error("API error: {status} - {}", message.as_deref().unwrap_or("(no message)"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// Response body did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// API did not answer in time.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Endpoint URL could not be built.
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl OrderApiError {
    /// Text to show the customer for a failed order.
    ///
    /// Server-provided messages are passed through verbatim. Everything else
    /// collapses to a generic fallback so transport details never reach the page.
    #[must_use]
    pub fn customer_message(&self) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::Rejected { .. } => REJECTED_FALLBACK_MESSAGE.to_string(),
            Self::Http(_) | Self::Parse(_) | Self::Timeout(_) | Self::Url(_) => {
                TRANSPORT_FALLBACK_MESSAGE.to_string()
            }
        }
    }
}

/// Operations the order flow needs from the order API.
pub trait OrderApi: Send + Sync {
    /// Fetch the product list.
    fn inventory(
        &self,
    ) -> impl Future<Output = Result<Vec<InventoryProduct>, OrderApiError>> + Send;

    /// Place an order.
    fn create_order(
        &self,
        order: &OrderDraft,
    ) -> impl Future<Output = Result<OrderCreated, OrderApiError>> + Send;

    /// Probe the API's health endpoint.
    fn health(&self) -> impl Future<Output = Result<(), OrderApiError>> + Send;
}

impl<T: OrderApi> OrderApi for Arc<T> {
    fn inventory(
        &self,
    ) -> impl Future<Output = Result<Vec<InventoryProduct>, OrderApiError>> + Send {
        (**self).inventory()
    }

    fn create_order(
        &self,
        order: &OrderDraft,
    ) -> impl Future<Output = Result<OrderCreated, OrderApiError>> + Send {
        (**self).create_order(order)
    }

    fn health(&self) -> impl Future<Output = Result<(), OrderApiError>> + Send {
        (**self).health()
    }
}
