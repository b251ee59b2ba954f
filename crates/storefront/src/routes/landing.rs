//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use super::order::start_page;
use crate::error::Result;
use crate::order_flow::PageView;
use crate::state::AppState;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "landing.html")]
pub struct LandingTemplate {
    /// Product headline.
    pub product_name: String,
    /// Pricing, quantity and checkout panel.
    pub panel: PageView,
}

/// Display the landing page.
///
/// Each page load starts a new page session: quantity back to 1, checkout
/// closed, pricing fetched again with the built-in price as fallback.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<LandingTemplate> {
    let panel = start_page(&state, &session).await?;

    Ok(LandingTemplate {
        product_name: state.config().order_api.product_name.clone(),
        panel,
    })
}
