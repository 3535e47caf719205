//! Saved-cart snapshots.
//!
//! A snapshot is taken from the active cart, parked on the shelf, and never
//! mutated afterwards. Reloading a snapshot removes it from the shelf.

use chrono::{DateTime, Utc};
use countertop_core::{Customer, SavedCartId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLine};

/// An immutable parked cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCart {
    pub id: SavedCartId,
    pub created_at: DateTime<Utc>,
    /// Customer selected when the cart was parked; `None` for walk-in.
    pub customer: Option<Customer>,
    pub lines: Vec<CartLine>,
    /// Tax-inclusive total at capture time, kept for shelf display.
    pub total: Decimal,
}

impl SavedCart {
    /// Snapshot the given cart. The caller guarantees the cart is non-empty.
    #[must_use]
    pub fn capture(cart: &Cart, customer: Option<Customer>, tax_rate: Decimal) -> Self {
        Self {
            id: SavedCartId::generate(),
            created_at: Utc::now(),
            customer,
            lines: cart.lines().to_vec(),
            total: cart.totals(tax_rate).total,
        }
    }
}
