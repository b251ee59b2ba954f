//! Unit price and quantity, and the totals derived from them.

use clean_girl_core::{Price, Quantity};
use serde::{Deserialize, Serialize};

use crate::order_api::InventoryProduct;

/// The controller's view of what one unit costs and how many are selected.
///
/// Subtotal and total are always derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingState {
    unit_price: Price,
    /// List price to show crossed out, present only for a genuine discount.
    original_price: Option<Price>,
    quantity: Quantity,
}

/// Display-ready pricing labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingSummary {
    pub quantity: u32,
    pub current_price: String,
    pub original_price: Option<String>,
    pub subtotal: String,
    pub total: String,
}

impl PricingState {
    /// Start at quantity one with a built-in unit price and no discount.
    #[must_use]
    pub const fn new(unit_price: Price) -> Self {
        Self {
            unit_price,
            original_price: None,
            quantity: Quantity::ONE,
        }
    }

    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.unit_price
    }

    #[must_use]
    pub const fn original_price(&self) -> Option<Price> {
        self.original_price
    }

    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// `unit price × quantity`.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.unit_price.times(self.quantity.get())
    }

    /// Same as the subtotal; there are no fees.
    #[must_use]
    pub fn total(&self) -> Price {
        self.subtotal()
    }

    /// Add one unit.
    pub const fn increase(&mut self) {
        self.quantity = self.quantity.increment();
    }

    /// Remove one unit. Returns `false` (and changes nothing) at the floor.
    pub const fn decrease(&mut self) -> bool {
        if self.quantity.is_minimum() {
            return false;
        }
        self.quantity = self.quantity.decrement();
        true
    }

    /// Back to a single unit.
    pub const fn reset_quantity(&mut self) {
        self.quantity = Quantity::ONE;
    }

    /// Adopt the authoritative pricing of an inventory entry.
    ///
    /// The discounted price wins whenever one is present (a zero discount
    /// counts as absent). The list price is only shown crossed out when the
    /// discount is strictly below it.
    pub fn apply_product(&mut self, product: &InventoryProduct) {
        let currency = self.unit_price.currency_code;
        let list_price = Price::from_cents(product.price_cents, currency);
        let discount = product.discount_cents.filter(|&cents| cents != 0);

        self.unit_price = discount.map_or(list_price, |cents| Price::from_cents(cents, currency));
        self.original_price = discount
            .filter(|&cents| cents < product.price_cents)
            .map(|_| list_price);
    }

    /// Labels for the pricing block.
    #[must_use]
    pub fn summary(&self) -> PricingSummary {
        PricingSummary {
            quantity: self.quantity.get(),
            current_price: self.unit_price.to_string(),
            original_price: self.original_price.map(|p| p.to_string()),
            subtotal: self.subtotal().to_string(),
            total: self.total().to_string(),
        }
    }
}

/// First inventory entry with exactly this name.
#[must_use]
pub fn find_product<'a>(
    products: &'a [InventoryProduct],
    name: &str,
) -> Option<&'a InventoryProduct> {
    products.iter().find(|p| p.name == name)
}
