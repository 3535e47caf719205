//! HTTP route handlers for the register terminal.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//!
//! # Register
//! GET  /register/cart                   - Cart view (lines + totals + customer)
//! POST /register/cart/items             - Add item {product_id, variant_id?}
//! POST /register/cart/items/quantity    - Set quantity {product_id, variant_id?, quantity}
//! POST /register/cart/items/remove      - Remove line {product_id, variant_id?}
//! POST /register/cart/clear             - Clear the cart
//! POST /register/cart/save              - Park the cart on the shelf
//! GET  /register/saved-carts            - List parked carts
//! POST /register/saved-carts/{id}/load  - Restore a parked cart
//! POST /register/customer               - Select customer {customer_id?}
//!
//! # Catalog (proxied to the back-office)
//! GET  /register/products/search?q=     - Debounced catalog search
//! GET  /register/customers?q=           - Customer lookup
//!
//! # Checkout
//! POST /register/checkout               - Submit order, clear cart on success
//! ```

pub mod checkout;
pub mod register;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the register routes router.
pub fn register_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(register::cart_view))
        .route("/cart/items", post(register::add_item))
        .route("/cart/items/quantity", post(register::set_quantity))
        .route("/cart/items/remove", post(register::remove_item))
        .route("/cart/clear", post(register::clear_cart))
        .route("/cart/save", post(register::save_cart))
        .route("/saved-carts", get(register::saved_carts))
        .route("/saved-carts/{id}/load", post(register::load_saved_cart))
        .route("/customer", post(register::select_customer))
        .route("/products/search", get(search::search_products))
        .route("/customers", get(search::search_customers))
        .route("/checkout", post(checkout::checkout))
}

/// Create the complete application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/register", register_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the back-office.
async fn health() -> &'static str {
    "ok"
}
