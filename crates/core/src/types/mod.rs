//! Core types for the Clean Girl storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod order;
pub mod price;
pub mod quantity;

pub use email::{Email, EmailError};
pub use order::{OrderDraft, OrderId, ValidationError, ValidationErrors};
pub use price::{CurrencyCode, Price};
pub use quantity::{Quantity, QuantityError};
