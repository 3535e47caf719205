//! Core types for Countertop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod catalog;
pub mod id;
pub mod order;
pub mod price;

pub use catalog::{Customer, Product, ProductVariant};
pub use id::*;
pub use order::{OrderDraft, OrderLine};
pub use price::{CurrencyCode, Price};
