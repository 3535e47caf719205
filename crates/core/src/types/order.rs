//! Order payload submitted to the back-office at checkout.
//!
//! The draft carries the register's own totals so the back-office can verify
//! the figures the operator saw. Line identity is the same composite the
//! register uses: product id plus optional variant id.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CustomerId, ProductId, VariantId};
use super::price::Price;

/// One order line in a checkout submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    /// Display name as shown at the register, variant-qualified when
    /// applicable (e.g., "Tea (Large)").
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// A complete order draft for checkout handoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub lines: Vec<OrderLine>,
    /// `None` for a walk-in sale.
    pub customer_id: Option<CustomerId>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}
