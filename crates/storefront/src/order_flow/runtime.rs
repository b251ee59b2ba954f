//! Async driver for [`OrderFlowController`].

use std::collections::VecDeque;
use std::time::Duration;

use tracing::{Instrument, Span, debug, warn};

use super::controller::OrderFlowController;
use super::event::{Command, Effect, Event};
use super::view::View;
use crate::config::DEFAULT_PRICING_TIMEOUT_MS;
use crate::order_api::{OrderApi, OrderApiError};

/// Runs events through a controller until nothing is left to do.
pub struct OrderFlow<'a, A> {
    controller: &'a mut OrderFlowController,
    api: &'a A,
    pricing_timeout: Duration,
}

impl<'a, A> OrderFlow<'a, A>
where
    A: OrderApi + Clone + 'static,
{
    pub const fn new(controller: &'a mut OrderFlowController, api: &'a A) -> Self {
        Self {
            controller,
            api,
            pricing_timeout: Duration::from_millis(DEFAULT_PRICING_TIMEOUT_MS),
        }
    }

    /// Cap how long an inventory lookup may hold up the page.
    #[must_use]
    pub const fn with_pricing_timeout(mut self, timeout: Duration) -> Self {
        self.pricing_timeout = timeout;
        self
    }

    /// Handle `event` and everything it leads to.
    ///
    /// UI updates are applied to `view` in the order the controller emits
    /// them. Commands are awaited where they appear, and their outcome is
    /// queued as the next event. The health probe is the exception: it runs
    /// in the background and nothing waits for it.
    pub async fn dispatch<V: View>(&mut self, event: Event, view: &mut V) {
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            for effect in self.controller.handle(event) {
                match effect {
                    Effect::Ui(update) => view.apply(update),
                    Effect::Command(command) => {
                        if let Some(next) = self.execute(command).await {
                            queue.push_back(next);
                        }
                    }
                }
            }
        }
    }

    async fn execute(&self, command: Command) -> Option<Event> {
        match command {
            Command::FetchInventory => {
                let lookup = tokio::time::timeout(self.pricing_timeout, self.api.inventory());
                Some(match lookup.await {
                    Ok(Ok(products)) => Event::PricingLoaded(products),
                    Ok(Err(error)) => Event::PricingUnavailable(error),
                    Err(_) => Event::PricingUnavailable(OrderApiError::Timeout(self.pricing_timeout)),
                })
            }
            Command::ProbeHealth => {
                let api = self.api.clone();
                tokio::spawn(
                    async move {
                        match api.health().await {
                            Ok(()) => debug!("Backend health check passed"),
                            Err(error) => warn!(error = %error, "Backend health check failed"),
                        }
                    }
                    .instrument(Span::current()),
                );
                None
            }
            Command::CreateOrder(draft) => Some(Event::SubmissionSettled(
                self.api
                    .create_order(&draft)
                    .await
                    .map(|created| created.order_id),
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use clean_girl_core::{CurrencyCode, OrderDraft, OrderId, Price};

    use super::*;
    use crate::order_api::{InventoryProduct, OrderCreated};
    use crate::order_flow::{CheckoutForm, PageView, UiUpdate};

    type Log = Arc<Mutex<Vec<UiUpdate>>>;

    /// Records every update into a log shared with the fake API.
    struct RecordingView(Log);

    impl View for RecordingView {
        fn apply(&mut self, update: UiUpdate) {
            self.0.lock().unwrap().push(update);
        }
    }

    enum OrderOutcome {
        Created(&'static str),
        Rejected(u16, Option<&'static str>),
        Unreachable,
    }

    struct FakeApi {
        inventory: Option<Vec<InventoryProduct>>,
        outcome: OrderOutcome,
        log: Log,
        orders: AtomicUsize,
        health_checks: AtomicUsize,
        /// Inventory and health requests never answer.
        hang: bool,
        /// Whether the submit control was disabled when the order went out.
        disabled_during_request: Mutex<Option<bool>>,
    }

    impl FakeApi {
        fn new(outcome: OrderOutcome, log: Log) -> Self {
            Self {
                inventory: None,
                outcome,
                log,
                orders: AtomicUsize::new(0),
                health_checks: AtomicUsize::new(0),
                hang: false,
                disabled_during_request: Mutex::new(None),
            }
        }
    }

    impl OrderApi for FakeApi {
        async fn inventory(&self) -> Result<Vec<InventoryProduct>, OrderApiError> {
            if self.hang {
                std::future::pending::<()>().await;
            }
            self.inventory
                .clone()
                .ok_or_else(|| OrderApiError::Parse("unreachable".to_string()))
        }

        async fn create_order(&self, _order: &OrderDraft) -> Result<OrderCreated, OrderApiError> {
            self.orders.fetch_add(1, Ordering::SeqCst);

            let last_enabled = self.log.lock().unwrap().iter().rev().find_map(|u| match u {
                UiUpdate::SubmitEnabled(enabled) => Some(*enabled),
                _ => None,
            });
            *self.disabled_during_request.lock().unwrap() = Some(last_enabled == Some(false));

            match self.outcome {
                OrderOutcome::Created(id) => Ok(OrderCreated {
                    order_id: OrderId::new(id),
                }),
                OrderOutcome::Rejected(status, message) => Err(OrderApiError::Rejected {
                    status,
                    message: message.map(String::from),
                }),
                OrderOutcome::Unreachable => Err(OrderApiError::Timeout(Duration::from_secs(10))),
            }
        }

        async fn health(&self) -> Result<(), OrderApiError> {
            if self.hang {
                std::future::pending::<()>().await;
            }
            self.health_checks.fetch_add(1, Ordering::SeqCst);
            Err(OrderApiError::Rejected {
                status: 503,
                message: None,
            })
        }
    }

    fn controller() -> OrderFlowController {
        OrderFlowController::new("Clean Girl", Price::from_cents(1990, CurrencyCode::USD))
    }

    /// A controller with the checkout form open.
    fn checkout() -> OrderFlowController {
        let mut controller = controller();
        controller.handle(Event::ProceedToCheckout);
        controller
    }

    /// The health probe runs detached; give it a chance to land.
    async fn wait_for_health_check(api: &FakeApi) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while api.health_checks.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            customer_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            address: "12 Orchard Lane, Springfield".to_string(),
            phone: "555-123-4567".to_string(),
        }
    }

    fn count(log: &Log, update: &UiUpdate) -> usize {
        log.lock().unwrap().iter().filter(|u| *u == update).count()
    }

    #[tokio::test]
    async fn test_page_ready_adopts_inventory_price() {
        let log = Log::default();
        let mut api = FakeApi::new(OrderOutcome::Created("unused"), log);
        api.inventory = Some(vec![InventoryProduct {
            name: "Clean Girl".to_string(),
            price_cents: 2000,
            discount_cents: Some(1500),
        }]);
        let api = Arc::new(api);
        let mut controller = controller();

        let mut view = PageView::new(&controller, CheckoutForm::default());
        OrderFlow::new(&mut controller, &api)
            .dispatch(Event::PageReady, &mut view)
            .await;

        assert_eq!(view.pricing.current_price, "$15.00");
        assert_eq!(view.pricing.original_price.as_deref(), Some("$20.00"));
        assert!(view.notifications.is_empty());

        wait_for_health_check(&api).await;
        assert_eq!(api.health_checks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_page_ready_keeps_default_when_inventory_fails() {
        let log = Log::default();
        let api = Arc::new(FakeApi::new(OrderOutcome::Created("unused"), log));
        let mut controller = controller();

        let mut view = PageView::new(&controller, CheckoutForm::default());
        OrderFlow::new(&mut controller, &api)
            .dispatch(Event::PageReady, &mut view)
            .await;

        assert_eq!(view.pricing.current_price, "$19.90");
        assert_eq!(view.pricing.original_price, None);
        assert!(view.notifications.is_empty());
    }

    #[tokio::test]
    async fn test_page_ready_finishes_when_backend_hangs() {
        let log = Log::default();
        let mut api = FakeApi::new(OrderOutcome::Created("unused"), log);
        api.hang = true;
        let api = Arc::new(api);
        let mut controller = controller();

        let mut view = PageView::new(&controller, CheckoutForm::default());
        let mut flow =
            OrderFlow::new(&mut controller, &api).with_pricing_timeout(Duration::from_millis(50));
        tokio::time::timeout(
            Duration::from_secs(2),
            flow.dispatch(Event::PageReady, &mut view),
        )
        .await
        .expect("page load must not wait on a silent backend");

        assert_eq!(view.pricing.current_price, "$19.90");
        assert!(view.notifications.is_empty());
        assert_eq!(api.health_checks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_submit_makes_no_request() {
        let log = Log::default();
        let api = Arc::new(FakeApi::new(OrderOutcome::Created("ABC123"), Arc::clone(&log)));
        let mut controller = checkout();
        let form = CheckoutForm {
            customer_name: "J".to_string(),
            ..valid_form()
        };

        OrderFlow::new(&mut controller, &api)
            .dispatch(Event::Submit(form), &mut RecordingView(Arc::clone(&log)))
            .await;

        assert_eq!(api.orders.load(Ordering::SeqCst), 0);
        let log = log.lock().unwrap();
        let [UiUpdate::Notify(note)] = log.as_slice() else {
            panic!("expected a single notification, got {log:?}");
        };
        assert!(note.message.contains("name"));
    }

    #[tokio::test]
    async fn test_success_disables_during_request_and_reenables_once() {
        let log = Log::default();
        let api = Arc::new(FakeApi::new(OrderOutcome::Created("ABC123"), Arc::clone(&log)));
        let mut controller = checkout();
        controller.handle(Event::IncreaseQuantity);

        OrderFlow::new(&mut controller, &api)
            .dispatch(Event::Submit(valid_form()), &mut RecordingView(Arc::clone(&log)))
            .await;

        assert_eq!(api.orders.load(Ordering::SeqCst), 1);
        assert_eq!(*api.disabled_during_request.lock().unwrap(), Some(true));
        assert_eq!(count(&log, &UiUpdate::SubmitEnabled(false)), 1);
        assert_eq!(count(&log, &UiUpdate::SubmitEnabled(true)), 1);
        assert_eq!(count(&log, &UiUpdate::Loading(true)), 1);
        assert_eq!(count(&log, &UiUpdate::Loading(false)), 1);
        assert_eq!(
            count(&log, &UiUpdate::ShowConfirmation(OrderId::new("ABC123"))),
            1
        );
        assert_eq!(controller.pricing().quantity().get(), 1);
    }

    #[tokio::test]
    async fn test_rejection_shows_server_message_and_reenables() {
        let log = Log::default();
        let api = Arc::new(FakeApi::new(
            OrderOutcome::Rejected(400, Some("Out of stock")),
            Arc::clone(&log),
        ));
        let mut controller = checkout();

        let mut view = PageView::new(&controller, valid_form());
        OrderFlow::new(&mut controller, &api)
            .dispatch(Event::Submit(valid_form()), &mut view)
            .await;

        assert_eq!(api.orders.load(Ordering::SeqCst), 1);
        assert_eq!(view.notifications.len(), 1);
        assert_eq!(view.notifications[0].message, "Out of stock");
        assert!(view.submit_enabled);
        assert!(!view.loading);
        assert_eq!(view.form, valid_form());
        assert!(!controller.is_submitting());
    }

    #[tokio::test]
    async fn test_transport_failure_shows_generic_message() {
        let log = Log::default();
        let api = Arc::new(FakeApi::new(OrderOutcome::Unreachable, Arc::clone(&log)));
        let mut controller = checkout();

        let mut view = PageView::new(&controller, valid_form());
        OrderFlow::new(&mut controller, &api)
            .dispatch(Event::Submit(valid_form()), &mut view)
            .await;

        assert_eq!(
            view.notifications[0].message,
            "Failed to place order. Please try again."
        );
        assert!(view.submit_enabled);
    }

    #[tokio::test]
    async fn test_rejection_without_message_uses_fallback() {
        let log = Log::default();
        let api = Arc::new(FakeApi::new(OrderOutcome::Rejected(500, None), Arc::clone(&log)));
        let mut controller = checkout();

        let mut view = PageView::new(&controller, valid_form());
        OrderFlow::new(&mut controller, &api)
            .dispatch(Event::Submit(valid_form()), &mut view)
            .await;

        assert_eq!(view.notifications[0].message, "Failed to place order");
    }
}
