//! Countertop Core - Shared types library.
//!
//! This crate provides common types used across all Countertop components:
//! - `register` - Cart/session engine with on-device persistence
//! - `terminal` - Register terminal JSON service
//! - `cli` - Command-line tools for on-device state management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices, plus the
//!   catalog and order types mirrored from the back-office

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
