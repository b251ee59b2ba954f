//! Inputs to and outputs from the order flow controller.

use std::time::Duration;

use clean_girl_core::{OrderDraft, OrderId};
use serde::{Deserialize, Serialize};

use super::pricing::PricingSummary;
use crate::order_api::{InventoryProduct, OrderApiError};

/// How long an error notification stays up before it dismisses itself.
pub const NOTIFICATION_LIFETIME: Duration = Duration::from_secs(5);

/// Raw checkout form fields as the customer typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
}

/// Something that happened on the page.
#[derive(Debug)]
pub enum Event {
    PageReady,
    PricingLoaded(Vec<InventoryProduct>),
    PricingUnavailable(OrderApiError),
    IncreaseQuantity,
    DecreaseQuantity,
    ProceedToCheckout,
    Submit(CheckoutForm),
    SubmissionSettled(Result<OrderId, OrderApiError>),
    DismissConfirmation,
}

/// Work the controller asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Ui(UiUpdate),
    Command(Command),
}

/// Remote calls; each one's outcome comes back as an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Resolves to `PricingLoaded` or `PricingUnavailable`.
    FetchInventory,
    /// Outcome is logged, never fed back.
    ProbeHealth,
    /// Resolves to `SubmissionSettled`.
    CreateOrder(OrderDraft),
}

/// Changes to what the visitor sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiUpdate {
    Pricing(PricingSummary),
    CheckoutVisible {
        visible: bool,
        scroll_into_view: bool,
    },
    SubmitEnabled(bool),
    Loading(bool),
    Notify(Notification),
    ShowConfirmation(OrderId),
    HideConfirmation,
    ResetForm,
}

/// A dismissible, self-expiring error banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// One or more messages separated by `\n`.
    pub message: String,
    pub expires_after: Duration,
}

impl Notification {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expires_after: NOTIFICATION_LIFETIME,
        }
    }

    /// Individual lines of the message.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.message.lines()
    }

    /// Lifetime in milliseconds, for client-side timers.
    #[must_use]
    pub fn expires_after_ms(&self) -> u128 {
        self.expires_after.as_millis()
    }
}

impl From<UiUpdate> for Effect {
    fn from(update: UiUpdate) -> Self {
        Self::Ui(update)
    }
}

impl From<Command> for Effect {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}
