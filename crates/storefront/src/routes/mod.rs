//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Landing page
//! GET  /health                 - Health check
//! GET  /static/*               - Static assets
//!
//! # Order panel (HTMX fragments)
//! POST /quantity/increase      - Add one unit
//! POST /quantity/decrease      - Remove one unit
//! POST /checkout               - Reveal the checkout form
//! POST /order                  - Validate and place the order
//! POST /confirmation/dismiss   - Close the order confirmation
//! ```

pub mod landing;
pub mod order;

use axum::{
    Router,
    http::Uri,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::error::AppError;
use crate::middleware::{
    create_session_layer, request_id::make_request_span, request_id_middleware,
    session_lock_middleware,
};
use crate::state::AppState;

/// Directory static assets are served from, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Create the order panel routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/quantity/increase", post(order::increase_quantity))
        .route("/quantity/decrease", post(order::decrease_quantity))
        .route("/checkout", post(order::proceed_to_checkout))
        .route("/order", post(order::submit_order))
        .route("/confirmation/dismiss", post(order::dismiss_confirmation))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Landing page
        .route("/", get(landing::show))
        // Order panel
        .merge(order_routes())
}

/// Build the full application: routes, static files and middleware.
pub fn app(state: AppState) -> Router {
    // The lock wraps the session layer so it is held until the session is saved
    let pages = routes()
        .layer(create_session_layer(state.config()))
        .layer(from_fn_with_state(state.clone(), session_lock_middleware));

    Router::new()
        .route("/health", get(health))
        .merge(pages)
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(not_found)
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the order API.
async fn health() -> &'static str {
    "ok"
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
