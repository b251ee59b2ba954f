//! Integration tests for the Clean Girl storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p clean-girl-integration-tests
//! ```
//!
//! No external services are needed: [`FakeBackend`] stands in for the
//! remote order API and [`spawn_storefront`] runs the real storefront
//! router, both on ephemeral localhost ports.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clean_girl_storefront::config::{OrderApiConfig, StorefrontConfig};
use clean_girl_storefront::routes;
use clean_girl_storefront::state::AppState;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

/// In-process stand-in for the remote order API.
///
/// Records every order body it receives and answers with canned responses.
#[derive(Clone)]
pub struct FakeBackend {
    inner: Arc<FakeBackendInner>,
}

struct FakeBackendInner {
    /// `None` answers `/inventory` with a 500.
    inventory: Mutex<Option<Value>>,
    /// `/inventory` and `/health` accept the request and never answer.
    hanging: AtomicBool,
    order_status: StatusCode,
    order_body: Value,
    orders: Mutex<Vec<Value>>,
    health_checks: AtomicUsize,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new(None, StatusCode::OK, json!({ "order_id": "ORDER-1" }))
    }
}

impl FakeBackend {
    /// Backend with the given inventory and `/order` response.
    #[must_use]
    pub fn new(inventory: Option<Value>, order_status: StatusCode, order_body: Value) -> Self {
        Self {
            inner: Arc::new(FakeBackendInner {
                inventory: Mutex::new(inventory),
                hanging: AtomicBool::new(false),
                order_status,
                order_body,
                orders: Mutex::new(Vec::new()),
                health_checks: AtomicUsize::new(0),
            }),
        }
    }

    /// Start serving; returns the API root with a trailing slash.
    pub async fn serve(&self) -> Url {
        let app = Router::new()
            .route("/inventory", get(inventory))
            .route("/order", post(order))
            .route("/health", get(health))
            .with_state(self.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Fake backend has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Fake backend failed");
        });

        Url::parse(&format!("http://{addr}/")).expect("Fake backend URL is valid")
    }

    /// Replace the inventory served from now on.
    pub fn set_inventory(&self, inventory: Option<Value>) {
        *self.inner.inventory.lock().expect("inventory lock poisoned") = inventory;
    }

    /// Stop answering `/inventory` and `/health`.
    pub fn hang(&self) {
        self.inner.hanging.store(true, Ordering::SeqCst);
    }

    async fn stall_if_hanging(&self) {
        if self.inner.hanging.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
    }

    /// Bodies of every `POST /order` received so far.
    #[must_use]
    pub fn orders(&self) -> Vec<Value> {
        self.inner.orders.lock().expect("orders lock poisoned").clone()
    }

    /// Number of `GET /health` probes received so far.
    #[must_use]
    pub fn health_checks(&self) -> usize {
        self.inner.health_checks.load(Ordering::SeqCst)
    }

    /// Wait (up to two seconds) for at least `count` health probes.
    ///
    /// The storefront probes in the background, so the page can be served
    /// before the probe lands.
    pub async fn wait_for_health_checks(&self, count: usize) -> usize {
        let _ = tokio::time::timeout(Duration::from_secs(2), async {
            while self.health_checks() < count {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        self.health_checks()
    }
}

async fn inventory(State(backend): State<FakeBackend>) -> Response {
    backend.stall_if_hanging().await;
    let inventory = backend
        .inner
        .inventory
        .lock()
        .expect("inventory lock poisoned")
        .clone();
    match inventory {
        Some(products) => Json(products).into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "inventory unavailable").into_response(),
    }
}

async fn order(State(backend): State<FakeBackend>, Json(body): Json<Value>) -> Response {
    backend
        .inner
        .orders
        .lock()
        .expect("orders lock poisoned")
        .push(body);
    (backend.inner.order_status, Json(backend.inner.order_body.clone())).into_response()
}

async fn health(State(backend): State<FakeBackend>) -> StatusCode {
    backend.stall_if_hanging().await;
    backend.inner.health_checks.fetch_add(1, Ordering::SeqCst);
    StatusCode::OK
}

/// An API root nothing is listening on.
pub async fn unreachable_api() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to reserve a port");
    let addr = listener.local_addr().expect("Listener has no address");
    drop(listener);
    Url::parse(&format!("http://{addr}/")).expect("URL is valid")
}

/// How long test storefronts wait for inventory.
pub const TEST_PRICING_TIMEOUT: Duration = Duration::from_millis(500);

/// Order API config pointing at `base_url`.
#[must_use]
pub fn order_api_config(base_url: Url) -> OrderApiConfig {
    OrderApiConfig {
        base_url,
        pricing_timeout: TEST_PRICING_TIMEOUT,
        ..OrderApiConfig::default()
    }
}

/// Run the storefront against `order_api`; returns its base URL.
pub async fn spawn_storefront(order_api: Url) -> String {
    let config = StorefrontConfig {
        host: "127.0.0.1".parse().expect("valid address"),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        order_api: order_api_config(order_api),
        sentry_dsn: None,
        sentry_environment: None,
    };
    let state = AppState::new(config).expect("Failed to build app state");
    let app = routes::app(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind storefront");
    let addr = listener.local_addr().expect("Storefront has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Storefront failed");
    });

    format!("http://{addr}")
}

/// HTTP client that keeps the session cookie between requests.
#[must_use]
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
