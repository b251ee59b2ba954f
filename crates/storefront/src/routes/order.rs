//! Order panel route handlers (HTMX fragments).
//!
//! Every handler loads the visitor's [`OrderFlowController`] from the
//! session, dispatches one event, saves the controller back and renders the
//! order panel. Requests from one visitor are serialised by
//! [`session_lock_middleware`](crate::middleware::session_lock_middleware).

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::session::keys;
use crate::order_flow::{CheckoutForm, Event, OrderFlow, OrderFlowController, PageView};
use crate::state::AppState;

/// Order panel fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_panel.html")]
pub struct OrderPanelTemplate {
    pub panel: PageView,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the visitor's controller, or start a new one.
async fn load_controller(state: &AppState, session: &Session) -> Result<OrderFlowController> {
    Ok(session
        .get::<OrderFlowController>(keys::ORDER_FLOW)
        .await?
        .unwrap_or_else(|| state.new_controller()))
}

/// Persist the visitor's controller.
async fn save_controller(session: &Session, controller: &OrderFlowController) -> Result<()> {
    session.insert(keys::ORDER_FLOW, controller).await?;
    Ok(())
}

/// Run one event through the visitor's controller and return the resulting view.
///
/// `form` seeds the checkout form fields so a rejected submission keeps
/// what the customer typed.
async fn run_event(
    state: &AppState,
    session: &Session,
    event: Event,
    form: CheckoutForm,
) -> Result<PageView> {
    let controller = load_controller(state, session).await?;
    drive(state, session, controller, event, form).await
}

/// Start a new page session: a fresh controller replaces whatever the
/// session held, then loads pricing.
pub(crate) async fn start_page(state: &AppState, session: &Session) -> Result<PageView> {
    drive(
        state,
        session,
        state.new_controller(),
        Event::PageReady,
        CheckoutForm::default(),
    )
    .await
}

/// Dispatch `event` and store the controller back in the session.
async fn drive(
    state: &AppState,
    session: &Session,
    mut controller: OrderFlowController,
    event: Event,
    form: CheckoutForm,
) -> Result<PageView> {
    let mut view = PageView::new(&controller, form);

    OrderFlow::new(&mut controller, state.order_api())
        .with_pricing_timeout(state.config().order_api.pricing_timeout)
        .dispatch(event, &mut view)
        .await;

    save_controller(session, &controller).await?;
    Ok(view)
}

async fn panel(
    state: &AppState,
    session: &Session,
    event: Event,
    form: CheckoutForm,
) -> Result<OrderPanelTemplate> {
    let panel = run_event(state, session, event, form).await?;
    Ok(OrderPanelTemplate { panel })
}

// =============================================================================
// Handlers
// =============================================================================

/// Add one unit.
///
/// POST /quantity/increase
#[instrument(skip(state, session))]
pub async fn increase_quantity(
    State(state): State<AppState>,
    session: Session,
) -> Result<OrderPanelTemplate> {
    panel(&state, &session, Event::IncreaseQuantity, CheckoutForm::default()).await
}

/// Remove one unit (never below one).
///
/// POST /quantity/decrease
#[instrument(skip(state, session))]
pub async fn decrease_quantity(
    State(state): State<AppState>,
    session: Session,
) -> Result<OrderPanelTemplate> {
    panel(&state, &session, Event::DecreaseQuantity, CheckoutForm::default()).await
}

/// Reveal the checkout form.
///
/// POST /checkout
#[instrument(skip(state, session))]
pub async fn proceed_to_checkout(
    State(state): State<AppState>,
    session: Session,
) -> Result<OrderPanelTemplate> {
    add_breadcrumb("checkout", "Proceeded to checkout");
    panel(&state, &session, Event::ProceedToCheckout, CheckoutForm::default()).await
}

/// Validate and place the order.
///
/// POST /order
#[instrument(skip(state, session, form))]
pub async fn submit_order(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<OrderPanelTemplate> {
    add_breadcrumb("checkout", "Submitted order");
    panel(&state, &session, Event::Submit(form.clone()), form).await
}

/// Close the order confirmation.
///
/// POST /confirmation/dismiss
#[instrument(skip(state, session))]
pub async fn dismiss_confirmation(
    State(state): State<AppState>,
    session: Session,
) -> Result<OrderPanelTemplate> {
    panel(&state, &session, Event::DismissConfirmation, CheckoutForm::default()).await
}
