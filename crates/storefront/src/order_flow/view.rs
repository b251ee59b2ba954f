//! Where UI updates land.

use clean_girl_core::OrderId;

use super::controller::OrderFlowController;
use super::event::{CheckoutForm, Notification, UiUpdate};
use super::pricing::PricingSummary;

/// Receives the controller's UI updates.
pub trait View {
    fn apply(&mut self, update: UiUpdate);
}

/// The rendered state of the order panel after a request.
///
/// Seeded from the controller, then updated by whatever the dispatched
/// event produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub pricing: PricingSummary,
    pub checkout_visible: bool,
    pub scroll_to_checkout: bool,
    pub submit_enabled: bool,
    pub loading: bool,
    pub notifications: Vec<Notification>,
    pub confirmation: Option<OrderId>,
    /// Field values to re-populate the checkout form with.
    pub form: CheckoutForm,
}

impl PageView {
    #[must_use]
    pub fn new(controller: &OrderFlowController, form: CheckoutForm) -> Self {
        Self {
            pricing: controller.pricing().summary(),
            checkout_visible: controller.is_checkout_visible(),
            scroll_to_checkout: false,
            submit_enabled: !controller.is_submitting(),
            loading: controller.is_submitting(),
            notifications: Vec::new(),
            confirmation: None,
            form,
        }
    }
}

impl View for PageView {
    fn apply(&mut self, update: UiUpdate) {
        match update {
            UiUpdate::Pricing(summary) => self.pricing = summary,
            UiUpdate::CheckoutVisible {
                visible,
                scroll_into_view,
            } => {
                self.checkout_visible = visible;
                self.scroll_to_checkout = scroll_into_view;
            }
            UiUpdate::SubmitEnabled(enabled) => self.submit_enabled = enabled,
            UiUpdate::Loading(loading) => self.loading = loading,
            UiUpdate::Notify(notification) => self.notifications.push(notification),
            UiUpdate::ShowConfirmation(order_id) => self.confirmation = Some(order_id),
            UiUpdate::HideConfirmation => self.confirmation = None,
            UiUpdate::ResetForm => self.form = CheckoutForm::default(),
        }
    }
}
