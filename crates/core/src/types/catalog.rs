//! Catalog types mirrored from the back-office.
//!
//! The back-office owns products, variants, and customers; the register only
//! reads them. Stock figures are the server-reported values at fetch time -
//! the register enforces them at mutation time, not continuously.

use serde::{Deserialize, Serialize};

use super::id::{CustomerId, ProductId, VariantId};
use super::price::Price;

/// A sellable product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: Option<String>,
    /// Units available according to the back-office.
    pub stock: u32,
    /// Declared variants. Empty for single-variant products.
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Whether the product declares variants that must be chosen at sale time.
    #[must_use]
    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }

    /// Look up a declared variant by id.
    #[must_use]
    pub fn variant(&self, id: VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.id == id)
    }
}

/// A product variant (size, colour, ...). Priced independently; stock is
/// tracked on the owning product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    pub name: String,
    pub price: Price,
}

/// A customer reference from the back-office customer list.
///
/// A register with no selected customer is serving a walk-in; there is no
/// sentinel customer record for that case, just `Option::None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::price::CurrencyCode;

    fn product_with_variants() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Tea".to_string(),
            price: Price::from_cents(450, CurrencyCode::USD),
            image: None,
            stock: 12,
            variants: vec![
                ProductVariant {
                    id: VariantId::new(10),
                    name: "Large".to_string(),
                    price: Price::from_cents(550, CurrencyCode::USD),
                },
                ProductVariant {
                    id: VariantId::new(11),
                    name: "Small".to_string(),
                    price: Price::from_cents(350, CurrencyCode::USD),
                },
            ],
        }
    }

    #[test]
    fn test_variant_lookup() {
        let product = product_with_variants();
        assert!(product.has_variants());
        assert_eq!(
            product.variant(VariantId::new(11)).map(|v| v.name.as_str()),
            Some("Small")
        );
        assert!(product.variant(VariantId::new(99)).is_none());
    }

    #[test]
    fn test_variants_default_to_empty_on_deserialize() {
        let json = r#"{"id":5,"name":"Mug","price":{"amount":"12.00","currency_code":"USD"},"image":null,"stock":3}"#;
        let product: Product = serde_json::from_str(json).expect("deserialize");
        assert!(!product.has_variants());
        assert_eq!(product.stock, 3);
    }
}
