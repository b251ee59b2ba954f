//! Order drafts and their validation rules.
//!
//! An [`OrderDraft`] is assembled from the checkout form at submission time.
//! [`OrderDraft::validate`] runs every rule and reports all failures at once
//! so the customer can fix the whole form in one pass.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::email::Email;

/// Minimum characters in a customer name.
pub const MIN_NAME_LENGTH: usize = 2;

/// Minimum characters in a phone number. Punctuation counts.
pub const MIN_PHONE_LENGTH: usize = 10;

/// Minimum characters in a delivery address.
pub const MIN_ADDRESS_LENGTH: usize = 10;

/// Identifier returned by the order API for a placed order. Opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Wrap an identifier returned by the order API.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A customer's order as entered at checkout.
///
/// Serializes to the order API's request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub quantity: u32,
}

/// A single failed validation rule.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid full name")]
    Name,
    #[error("Please enter a valid email address")]
    Email,
    #[error("Please enter a valid phone number")]
    Phone,
    #[error("Please enter a complete delivery address")]
    Address,
    #[error("Quantity must be at least 1")]
    Quantity,
}

/// Every rule an [`OrderDraft`] failed, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// The individual failures.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Whether a specific rule failed.
    #[must_use]
    pub fn contains(&self, error: ValidationError) -> bool {
        self.0.contains(&error)
    }
}

impl fmt::Display for ValidationErrors {
    /// One message per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl OrderDraft {
    /// Build a draft from raw form values, trimming surrounding whitespace.
    #[must_use]
    pub fn from_form(
        customer_name: &str,
        email: &str,
        address: &str,
        phone: &str,
        quantity: u32,
    ) -> Self {
        Self {
            customer_name: customer_name.trim().to_owned(),
            email: email.trim().to_owned(),
            address: address.trim().to_owned(),
            phone: phone.trim().to_owned(),
            quantity,
        }
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns all failed rules, not just the first.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        if self.customer_name.chars().count() < MIN_NAME_LENGTH {
            errors.push(ValidationError::Name);
        }
        if Email::parse(&self.email).is_err() {
            errors.push(ValidationError::Email);
        }
        if self.phone.chars().count() < MIN_PHONE_LENGTH {
            errors.push(ValidationError::Phone);
        }
        if self.address.chars().count() < MIN_ADDRESS_LENGTH {
            errors.push(ValidationError::Address);
        }
        if self.quantity < 1 {
            errors.push(ValidationError::Quantity);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}
