//! The order flow state machine.

use clean_girl_core::{OrderDraft, Price};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::event::{CheckoutForm, Command, Effect, Event, Notification, UiUpdate};
use super::pricing::{PricingState, find_product};

/// Per-visitor checkout state.
///
/// Serializable so it can live in the visitor's session between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFlowController {
    /// Inventory entry whose pricing the page adopts.
    product_name: String,
    pricing: PricingState,
    /// An order request is in flight; further submissions are ignored.
    submitting: bool,
    checkout_visible: bool,
}

impl OrderFlowController {
    /// Create a controller with built-in pricing for `product_name`.
    #[must_use]
    pub fn new(product_name: impl Into<String>, default_unit_price: Price) -> Self {
        Self {
            product_name: product_name.into(),
            pricing: PricingState::new(default_unit_price),
            submitting: false,
            checkout_visible: false,
        }
    }

    #[must_use]
    pub const fn pricing(&self) -> &PricingState {
        &self.pricing
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub const fn is_checkout_visible(&self) -> bool {
        self.checkout_visible
    }

    #[must_use]
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Apply an event and return the effects it produces, in order.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::PageReady => vec![
                self.pricing_update(),
                Command::FetchInventory.into(),
                Command::ProbeHealth.into(),
            ],
            Event::PricingLoaded(products) => {
                let Some(product) = find_product(&products, &self.product_name) else {
                    debug!(product = %self.product_name, "Product not in inventory, keeping default price");
                    return Vec::new();
                };
                self.pricing.apply_product(product);
                vec![self.pricing_update()]
            }
            Event::PricingUnavailable(error) => {
                info!(error = %error, "Error fetching product info, keeping default price");
                Vec::new()
            }
            Event::IncreaseQuantity => {
                self.pricing.increase();
                vec![self.pricing_update()]
            }
            Event::DecreaseQuantity => {
                if self.pricing.decrease() {
                    vec![self.pricing_update()]
                } else {
                    Vec::new()
                }
            }
            Event::ProceedToCheckout => {
                self.checkout_visible = true;
                vec![
                    UiUpdate::CheckoutVisible {
                        visible: true,
                        scroll_into_view: true,
                    }
                    .into(),
                ]
            }
            Event::Submit(form) => self.submit(&form),
            Event::SubmissionSettled(result) => {
                if !self.submitting {
                    warn!("Order result arrived with no submission in flight, ignoring");
                    return Vec::new();
                }
                self.submitting = false;

                let mut effects = match result {
                    Ok(order_id) => {
                        info!(order_id = %order_id, "Order placed");
                        self.pricing.reset_quantity();
                        self.checkout_visible = false;
                        vec![
                            UiUpdate::ShowConfirmation(order_id).into(),
                            self.pricing_update(),
                            UiUpdate::ResetForm.into(),
                            UiUpdate::CheckoutVisible {
                                visible: false,
                                scroll_into_view: false,
                            }
                            .into(),
                        ]
                    }
                    Err(error) => {
                        warn!(error = %error, "Order placement error");
                        vec![UiUpdate::Notify(Notification::error(error.customer_message())).into()]
                    }
                };

                // Restored on every outcome
                effects.push(UiUpdate::Loading(false).into());
                effects.push(UiUpdate::SubmitEnabled(true).into());
                effects
            }
            Event::DismissConfirmation => vec![UiUpdate::HideConfirmation.into()],
        }
    }

    fn submit(&mut self, form: &CheckoutForm) -> Vec<Effect> {
        if self.submitting {
            debug!("Submission already in flight, ignoring");
            return Vec::new();
        }
        if !self.checkout_visible {
            debug!("Checkout form is closed, ignoring submission");
            return Vec::new();
        }

        let draft = OrderDraft::from_form(
            &form.customer_name,
            &form.email,
            &form.address,
            &form.phone,
            self.pricing.quantity().get(),
        );

        if let Err(errors) = draft.validate() {
            debug!(failures = errors.errors().len(), "Order form rejected");
            return vec![UiUpdate::Notify(Notification::error(errors.to_string())).into()];
        }

        self.submitting = true;
        vec![
            UiUpdate::SubmitEnabled(false).into(),
            UiUpdate::Loading(true).into(),
            Command::CreateOrder(draft).into(),
        ]
    }

    fn pricing_update(&self) -> Effect {
        UiUpdate::Pricing(self.pricing.summary()).into()
    }
}
