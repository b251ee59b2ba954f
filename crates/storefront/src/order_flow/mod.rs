//! Checkout order flow.
//!
//! The flow is split into a pure state machine and an async driver:
//!
//! - [`OrderFlowController`] owns the per-visitor page state (quantity, unit
//!   price, checkout visibility, in-flight submission) and turns each
//!   [`Event`] into a list of [`Effect`]s. It performs no I/O.
//! - [`OrderFlow`] feeds events to a controller, applies UI effects to a
//!   [`View`], runs commands against an [`OrderApi`](crate::order_api::OrderApi)
//!   and feeds their results back in as events.
//!
//! # Events
//!
//! ```text
//! PageReady            -> show pricing, fetch inventory (capped), probe health (detached)
//! PricingLoaded        -> adopt the configured product's price
//! PricingUnavailable   -> keep the default price (logged only)
//! IncreaseQuantity     -> quantity + 1, reprice
//! DecreaseQuantity     -> quantity - 1 unless already 1, reprice
//! ProceedToCheckout    -> reveal and scroll to the checkout form
//! Submit               -> if the form is open and idle: validate, lock, create the order
//! SubmissionSettled    -> unlock the form, confirm or report the failure
//! DismissConfirmation  -> hide the confirmation
//! ```

mod controller;
mod event;
mod pricing;
mod runtime;
mod view;

pub use controller::OrderFlowController;
pub use event::{CheckoutForm, Command, Effect, Event, Notification, UiUpdate};
pub use pricing::{PricingState, PricingSummary, find_product};
pub use runtime::OrderFlow;
pub use view::{PageView, View};
