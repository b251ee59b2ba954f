//! Wire types for the order API.

use clean_girl_core::OrderId;
use serde::{Deserialize, Serialize};

/// A product entry from `GET /inventory`.
///
/// Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryProduct {
    pub name: String,
    /// List price in cents.
    pub price_cents: i64,
    /// Discounted price in cents, if the product is on sale.
    #[serde(default)]
    pub discount_cents: Option<i64>,
}

/// Success body of `POST /order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreated {
    pub order_id: OrderId,
}

/// Failure body of `POST /order`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
