//! Clean Girl Core - Shared types library.
//!
//! This crate provides the domain types used by the Clean Girl storefront:
//! prices, quantities, email addresses, and the order draft a customer
//! assembles at checkout, together with its validation rules.
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and easy to test.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for prices, quantities, emails, and orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
