//! Register failure taxonomy.
//!
//! Every guard condition is a typed error; callers decide how to surface
//! it (the terminal maps them to JSON error responses). None of these are
//! fatal: prior state is always left intact.

use countertop_core::{ProductId, SavedCartId, VariantId};
use thiserror::Error;

use crate::store::StoreError;

/// Errors from register mutations.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// The product has no stock at all.
    #[error("product {product} is out of stock")]
    OutOfStock { product: ProductId },

    /// The product declares variants and none was chosen; the caller should
    /// prompt for a selection and retry.
    #[error("product {product} requires a variant selection")]
    VariantRequired { product: ProductId },

    /// The chosen variant is not declared by the product.
    #[error("variant {variant} is not declared by product {product}")]
    UnknownVariant {
        product: ProductId,
        variant: VariantId,
    },

    /// The requested quantity exceeds the server-reported stock.
    #[error("requested quantity {requested} exceeds available stock {available}")]
    InsufficientStock { requested: u32, available: u32 },

    /// The operation needs a non-empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// No snapshot on the saved-cart shelf has this id.
    #[error("no saved cart with id {id}")]
    UnknownSavedCart { id: SavedCartId },

    /// Persisting or restoring on-device state failed.
    #[error("state store error: {0}")]
    Store(#[from] StoreError),
}

impl RegisterError {
    /// Stable machine-readable code for API payloads.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::OutOfStock { .. } => "out_of_stock",
            Self::VariantRequired { .. } => "variant_required",
            Self::UnknownVariant { .. } => "unknown_variant",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::EmptyCart => "empty_cart",
            Self::UnknownSavedCart { .. } => "unknown_saved_cart",
            Self::Store(_) => "store_error",
        }
    }
}
