//! Register route handlers: cart mutations, saved carts, customer selection.
//!
//! Each mutation resolves catalog data from the back-office first (stock is
//! the server-reported figure at mutation time), then applies the change
//! under the session lock and answers with the full cart view.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use countertop_core::{Customer, CustomerId, ProductId, SavedCartId, VariantId};
use countertop_register::{CartLine, LineKey, SavedCart, Totals};

use crate::error::Result;
use crate::state::AppState;

/// A reference to a cart line in request payloads.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LineRef {
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
}

impl From<LineRef> for LineKey {
    fn from(line: LineRef) -> Self {
        Self {
            product: line.product_id,
            variant: line.variant_id,
        }
    }
}

/// Request body for adding an item.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
}

/// Request body for setting a line quantity.
#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    #[serde(flatten)]
    pub line: LineRef,
    pub quantity: u32,
}

/// Request body for selecting a customer. Omitting `customer_id` returns
/// the register to walk-in.
#[derive(Debug, Deserialize)]
pub struct SelectCustomerRequest {
    pub customer_id: Option<CustomerId>,
}

/// Response body for saving a cart.
#[derive(Debug, Serialize)]
pub struct SaveCartResponse {
    /// `None` when the cart was empty and nothing was parked.
    pub saved_cart_id: Option<SavedCartId>,
}

/// The full cart view returned by every register endpoint.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub totals: Totals,
    pub customer: Option<Customer>,
}

impl CartView {
    pub(crate) fn from_session(
        session: &countertop_register::RegisterSession<countertop_register::FileStore>,
    ) -> Self {
        Self {
            lines: session.cart().lines().to_vec(),
            totals: session.totals(),
            customer: session.customer().cloned(),
        }
    }
}

/// Current cart contents and totals.
#[instrument(skip(state))]
pub async fn cart_view(State(state): State<AppState>) -> Json<CartView> {
    let session = state.session().lock().await;
    Json(CartView::from_session(&session))
}

/// Add one unit of a product (or variant) to the cart.
#[instrument(skip(state))]
pub async fn add_item(
    State(state): State<AppState>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartView>> {
    let product = state.backoffice().get_product(request.product_id).await?;

    let mut session = state.session().lock().await;
    session.add_item(&product, request.variant_id)?;
    Ok(Json(CartView::from_session(&session)))
}

/// Set a line's quantity; zero removes the line.
#[instrument(skip(state))]
pub async fn set_quantity(
    State(state): State<AppState>,
    Json(request): Json<SetQuantityRequest>,
) -> Result<Json<CartView>> {
    // Stock is re-read from the back-office at mutation time.
    let product = state
        .backoffice()
        .get_product(request.line.product_id)
        .await?;

    let mut session = state.session().lock().await;
    session.set_quantity(&request.line.into(), request.quantity, product.stock)?;
    Ok(Json(CartView::from_session(&session)))
}

/// Remove a line from the cart.
#[instrument(skip(state))]
pub async fn remove_item(
    State(state): State<AppState>,
    Json(request): Json<LineRef>,
) -> Result<Json<CartView>> {
    let mut session = state.session().lock().await;
    session.remove_line(&request.into())?;
    Ok(Json(CartView::from_session(&session)))
}

/// Empty the cart and delete its persisted document.
#[instrument(skip(state))]
pub async fn clear_cart(State(state): State<AppState>) -> Result<Json<CartView>> {
    let mut session = state.session().lock().await;
    session.clear_cart()?;
    Ok(Json(CartView::from_session(&session)))
}

/// Park the active cart on the saved-cart shelf.
#[instrument(skip(state))]
pub async fn save_cart(State(state): State<AppState>) -> Result<Json<SaveCartResponse>> {
    let mut session = state.session().lock().await;
    let saved_cart_id = session.save_cart()?;
    Ok(Json(SaveCartResponse { saved_cart_id }))
}

/// List parked carts, oldest first.
#[instrument(skip(state))]
pub async fn saved_carts(State(state): State<AppState>) -> Json<Vec<SavedCart>> {
    let session = state.session().lock().await;
    Json(session.saved_carts().to_vec())
}

/// Restore a parked cart as the active cart.
#[instrument(skip(state))]
pub async fn load_saved_cart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CartView>> {
    let mut session = state.session().lock().await;
    session.load_saved_cart(SavedCartId::from(id))?;
    Ok(Json(CartView::from_session(&session)))
}

/// Select the customer for the sale, or return to walk-in.
#[instrument(skip(state))]
pub async fn select_customer(
    State(state): State<AppState>,
    Json(request): Json<SelectCustomerRequest>,
) -> Result<Json<CartView>> {
    let customer = match request.customer_id {
        Some(id) => Some(state.backoffice().get_customer(id).await?),
        None => None,
    };

    let mut session = state.session().lock().await;
    session.select_customer(customer)?;
    Ok(Json(CartView::from_session(&session)))
}
