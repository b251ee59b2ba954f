//! `reqwest` implementation of [`OrderApi`].

use std::sync::Arc;
use std::time::Duration;

use clean_girl_core::OrderDraft;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{ErrorBody, InventoryProduct, OrderApi, OrderApiError, OrderCreated};
use crate::config::OrderApiConfig;

/// Give up on unreachable hosts; established requests are never cut short.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the remote order API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct OrderApiClient {
    inner: Arc<OrderApiClientInner>,
}

struct OrderApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl OrderApiClient {
    /// Create a new order API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &OrderApiConfig) -> Result<Self, OrderApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(OrderApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// The API root this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, OrderApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Read a response, decoding success bodies as `T` and failure bodies as
    /// [`ErrorBody`].
    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, OrderApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Failure bodies are optional and may not be JSON at all
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error);
            return Err(OrderApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| OrderApiError::Parse(e.to_string()))
    }
}

impl OrderApi for OrderApiClient {
    #[instrument(skip(self))]
    async fn inventory(&self) -> Result<Vec<InventoryProduct>, OrderApiError> {
        let url = self.endpoint("inventory")?;
        let response = self.inner.client.get(url).send().await?;
        let products: Vec<InventoryProduct> = Self::read_json(response).await?;
        debug!(count = products.len(), "Fetched inventory");
        Ok(products)
    }

    #[instrument(skip(self, order), fields(quantity = order.quantity))]
    async fn create_order(&self, order: &OrderDraft) -> Result<OrderCreated, OrderApiError> {
        let url = self.endpoint("order")?;
        let response = self.inner.client.post(url).json(order).send().await?;
        let created: OrderCreated = Self::read_json(response).await?;
        debug!(order_id = %created.order_id, "Order created");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn health(&self) -> Result<(), OrderApiError> {
        let url = self.endpoint("health")?;
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(OrderApiError::Rejected {
                status: status.as_u16(),
                message: None,
            });
        }

        Ok(())
    }
}
