//! Checkout handoff.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::{info, instrument};

use crate::backoffice::OrderReceipt;
use crate::error::Result;
use crate::state::AppState;

/// Checkout response: the back-office's order reference.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order: OrderReceipt,
}

/// Submit the current cart as an order.
///
/// The session lock is held across the submission so no mutation can slip
/// between building the draft and clearing the cart. The cart is cleared
/// only after the back-office accepts the order; on any failure it is left
/// exactly as it was.
#[instrument(skip(state))]
pub async fn checkout(State(state): State<AppState>) -> Result<Json<CheckoutResponse>> {
    let mut session = state.session().lock().await;
    let draft = session.order_draft()?;

    let receipt = state.backoffice().submit_order(&draft).await?;
    session.clear_cart()?;

    info!(reference = %receipt.reference, total = %draft.total, "order submitted");
    Ok(Json(CheckoutResponse { order: receipt }))
}
