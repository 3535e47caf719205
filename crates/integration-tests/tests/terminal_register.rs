//! Integration tests for the register cart flow.
//!
//! These tests require:
//! - A running terminal (cargo run -p countertop-terminal)
//! - A reachable back-office with at least product id 1 in stock
//!
//! Run with: cargo test -p countertop-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

/// Base URL for the terminal (configurable via environment).
fn terminal_base_url() -> String {
    std::env::var("TERMINAL_BASE_URL").unwrap_or_else(|_| "http://localhost:4100".to_string())
}

/// Product id known to exist in the test back-office catalog.
fn test_product_id() -> i64 {
    std::env::var("TEST_PRODUCT_ID")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(1)
}

async fn get_cart(client: &Client) -> Value {
    let base_url = terminal_base_url();
    client
        .get(format!("{base_url}/register/cart"))
        .send()
        .await
        .expect("Failed to fetch cart")
        .json()
        .await
        .expect("Failed to parse cart view")
}

async fn clear_cart(client: &Client) {
    let base_url = terminal_base_url();
    let resp = client
        .post(format!("{base_url}/register/cart/clear"))
        .send()
        .await
        .expect("Failed to clear cart");
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
#[ignore = "Requires running terminal server"]
async fn test_health() {
    let resp = reqwest::get(format!("{}/health", terminal_base_url()))
        .await
        .expect("Failed to reach terminal");
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Cart Flow
// ============================================================================

#[tokio::test]
#[ignore = "Requires running terminal server and back-office catalog"]
async fn test_add_update_remove_roundtrip() {
    let client = Client::new();
    let base_url = terminal_base_url();
    clear_cart(&client).await;

    // Add one unit
    let resp = client
        .post(format!("{base_url}/register/cart/items"))
        .json(&json!({ "product_id": test_product_id() }))
        .send()
        .await
        .expect("Failed to add item");
    assert_eq!(resp.status(), StatusCode::OK);

    // Adding the same product again merges into one line at quantity 2
    let resp = client
        .post(format!("{base_url}/register/cart/items"))
        .json(&json!({ "product_id": test_product_id() }))
        .send()
        .await
        .expect("Failed to add item");
    assert_eq!(resp.status(), StatusCode::OK);

    let cart = get_cart(&client).await;
    let lines = cart["lines"].as_array().expect("lines array");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"], 2);

    // Setting quantity to zero removes the line
    let resp = client
        .post(format!("{base_url}/register/cart/items/quantity"))
        .json(&json!({ "product_id": test_product_id(), "quantity": 0 }))
        .send()
        .await
        .expect("Failed to set quantity");
    assert_eq!(resp.status(), StatusCode::OK);

    let cart = get_cart(&client).await;
    assert!(cart["lines"].as_array().expect("lines array").is_empty());
}

#[tokio::test]
#[ignore = "Requires running terminal server and back-office catalog"]
async fn test_totals_are_consistent() {
    let client = Client::new();
    let base_url = terminal_base_url();
    clear_cart(&client).await;

    let resp = client
        .post(format!("{base_url}/register/cart/items"))
        .json(&json!({ "product_id": test_product_id() }))
        .send()
        .await
        .expect("Failed to add item");
    assert_eq!(resp.status(), StatusCode::OK);

    let cart = get_cart(&client).await;
    let totals = &cart["totals"];
    let subtotal: f64 = totals["subtotal"].as_str().expect("subtotal").parse().expect("decimal");
    let tax: f64 = totals["tax"].as_str().expect("tax").parse().expect("decimal");
    let total: f64 = totals["total"].as_str().expect("total").parse().expect("decimal");
    assert!((subtotal + tax - total).abs() < 1e-9);
}

#[tokio::test]
#[ignore = "Requires running terminal server and back-office catalog"]
async fn test_save_and_load_cart() {
    let client = Client::new();
    let base_url = terminal_base_url();
    clear_cart(&client).await;

    // Saving an empty cart parks nothing
    let resp: Value = client
        .post(format!("{base_url}/register/cart/save"))
        .send()
        .await
        .expect("Failed to save cart")
        .json()
        .await
        .expect("Failed to parse save response");
    assert!(resp["saved_cart_id"].is_null());

    // Park a one-line cart
    client
        .post(format!("{base_url}/register/cart/items"))
        .json(&json!({ "product_id": test_product_id() }))
        .send()
        .await
        .expect("Failed to add item");
    let resp: Value = client
        .post(format!("{base_url}/register/cart/save"))
        .send()
        .await
        .expect("Failed to save cart")
        .json()
        .await
        .expect("Failed to parse save response");
    let saved_id = resp["saved_cart_id"].as_str().expect("snapshot id").to_string();

    let cart = get_cart(&client).await;
    assert!(cart["lines"].as_array().expect("lines array").is_empty());

    // Restore it; the shelf entry is consumed
    let resp = client
        .post(format!("{base_url}/register/saved-carts/{saved_id}/load"))
        .send()
        .await
        .expect("Failed to load saved cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let cart = get_cart(&client).await;
    assert_eq!(cart["lines"].as_array().expect("lines array").len(), 1);

    let shelf: Value = client
        .get(format!("{base_url}/register/saved-carts"))
        .send()
        .await
        .expect("Failed to list saved carts")
        .json()
        .await
        .expect("Failed to parse shelf");
    assert!(shelf.as_array().expect("shelf array").is_empty());

    clear_cart(&client).await;
}

#[tokio::test]
#[ignore = "Requires running terminal server"]
async fn test_checkout_on_empty_cart_conflicts() {
    let client = Client::new();
    let base_url = terminal_base_url();
    clear_cart(&client).await;

    let resp = client
        .post(format!("{base_url}/register/checkout"))
        .send()
        .await
        .expect("Failed to call checkout");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(body["error"]["code"], "empty_cart");
}
