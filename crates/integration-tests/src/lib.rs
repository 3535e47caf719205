//! Integration tests for Countertop.
//!
//! # Running Tests
//!
//! ```bash
//! # Start a terminal against a back-office (or a stub of one)
//! cargo run -p countertop-terminal
//!
//! # Run integration tests
//! cargo test -p countertop-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `terminal_register` - Register cart flow over HTTP
//!
//! Tests are `#[ignore]`d by default: they require a running terminal with
//! a reachable back-office, which CI does not provide.
