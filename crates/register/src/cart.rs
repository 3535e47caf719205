//! The active cart: an ordered line list with decimal totals.
//!
//! Lines are keyed by [`LineKey`], a composite of product id and optional
//! variant id. A bare product and one of its variants are always distinct
//! lines, even if the back-office happens to reuse integer ids across the
//! two spaces.

use countertop_core::{Price, ProductId, VariantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default tax rate applied when the terminal has no configured rate.
#[must_use]
pub fn default_tax_rate() -> Decimal {
    Decimal::new(10, 2) // 0.10
}

/// Identity of a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub product: ProductId,
    pub variant: Option<VariantId>,
}

impl LineKey {
    /// Key for a line holding a bare (variant-less) product.
    #[must_use]
    pub const fn bare(product: ProductId) -> Self {
        Self {
            product,
            variant: None,
        }
    }

    /// Key for a line holding a specific variant of a product.
    #[must_use]
    pub const fn with_variant(product: ProductId, variant: VariantId) -> Self {
        Self {
            product,
            variant: Some(variant),
        }
    }
}

/// Display name for a cart line; variant lines render as
/// `"<productName> (<variantName>)"`.
#[must_use]
pub fn line_display_name(product_name: &str, variant_name: Option<&str>) -> String {
    variant_name.map_or_else(
        || product_name.to_string(),
        |variant| format!("{product_name} ({variant})"),
    )
}

/// One line of the active cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub key: LineKey,
    /// Display name, variant-qualified when applicable.
    pub name: String,
    pub unit_price: Price,
    pub image: Option<String>,
    /// Always a positive integer; a line at zero is removed, never kept.
    pub quantity: u32,
}

impl CartLine {
    /// Extended total for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.extended(self.quantity)
    }
}

/// Derived cart totals. Recomputed on demand, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl Totals {
    /// Compute totals for a subtotal at the given tax rate.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal, tax_rate: Decimal) -> Self {
        let tax = subtotal * tax_rate;
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

/// The active cart: an ordered sequence of lines with unique keys.
///
/// Adding a key that is already present increments that line's quantity
/// instead of appending a duplicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Rebuild a cart from a stored or snapshotted line sequence.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Current quantity for a key, zero if the line is absent.
    #[must_use]
    pub fn quantity_of(&self, key: &LineKey) -> u32 {
        self.lines
            .iter()
            .find(|line| line.key == *key)
            .map_or(0, |line| line.quantity)
    }

    /// Look up a line by key.
    #[must_use]
    pub fn find(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.key == *key)
    }

    /// Add one unit under `line.key`: increments the existing line's
    /// quantity, or appends `line` at the end of the cart.
    pub fn upsert(&mut self, line: CartLine) {
        if let Some(existing) = self.lines.iter_mut().find(|l| l.key == line.key) {
            existing.quantity += line.quantity;
        } else {
            self.lines.push(line);
        }
    }

    /// Set a line's quantity. Zero removes the line. Returns `true` if the
    /// cart changed (the key was present).
    pub fn set_quantity(&mut self, key: &LineKey, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(key);
        }
        match self.lines.iter_mut().find(|line| line.key == *key) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a line. Returns `true` if the key was present.
    pub fn remove(&mut self, key: &LineKey) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.key != *key);
        self.lines.len() != before
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Totals at the given tax rate.
    #[must_use]
    pub fn totals(&self, tax_rate: Decimal) -> Totals {
        Totals::from_subtotal(self.subtotal(), tax_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use countertop_core::CurrencyCode;

    fn line(product: i32, cents: i64, quantity: u32) -> CartLine {
        CartLine {
            key: LineKey::bare(ProductId::new(product)),
            name: format!("Product {product}"),
            unit_price: Price::from_cents(cents, CurrencyCode::USD),
            image: None,
            quantity,
        }
    }

    #[test]
    fn test_upsert_increments_existing_line() {
        let mut cart = Cart::default();
        cart.upsert(line(1, 1000, 1));
        cart.upsert(line(1, 1000, 1));

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.quantity_of(&LineKey::bare(ProductId::new(1))), 2);
    }

    #[test]
    fn test_bare_product_and_variant_are_distinct_lines() {
        let product = ProductId::new(1);
        let mut cart = Cart::default();
        cart.upsert(line(1, 1000, 1));
        cart.upsert(CartLine {
            key: LineKey::with_variant(product, VariantId::new(1)),
            name: "Product 1 (Large)".to_string(),
            unit_price: Price::from_cents(1200, CurrencyCode::USD),
            image: None,
            quantity: 1,
        });

        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let key = LineKey::bare(ProductId::new(1));
        let mut cart = Cart::default();
        cart.upsert(line(1, 1000, 2));

        assert!(cart.set_quantity(&key, 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_on_missing_line_is_noop() {
        let mut cart = Cart::default();
        assert!(!cart.set_quantity(&LineKey::bare(ProductId::new(9)), 3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_worked_example() {
        // [(p1, $10 x 2), (p2, $5 x 1)] at 10% -> 25.00 / 2.50 / 27.50
        let mut cart = Cart::default();
        cart.upsert(line(1, 1000, 2));
        cart.upsert(line(2, 500, 1));

        let totals = cart.totals(default_tax_rate());
        assert_eq!(totals.subtotal, Decimal::new(2500, 2));
        assert_eq!(totals.tax, Decimal::new(250, 2));
        assert_eq!(totals.total, Decimal::new(2750, 2));
    }

    #[test]
    fn test_total_is_subtotal_plus_tax_for_any_rate() {
        let mut cart = Cart::default();
        cart.upsert(line(1, 333, 3));
        cart.upsert(line(2, 199, 7));

        for rate_cents in [0, 7, 10, 21, 25] {
            let rate = Decimal::new(rate_cents, 2);
            let totals = cart.totals(rate);
            assert_eq!(totals.total, totals.subtotal + totals.subtotal * rate);
        }
    }

    #[test]
    fn test_line_display_name() {
        assert_eq!(line_display_name("Tea", None), "Tea");
        assert_eq!(line_display_name("Tea", Some("Large")), "Tea (Large)");
    }
}
