//! The register session: the mutation surface over cart, customer, and
//! saved carts.
//!
//! Every successful mutation is mirrored to the state store before the call
//! returns, so a terminal restart resumes exactly where the operator left
//! off. Guard failures (stock, variant selection) leave both the in-memory
//! state and the persisted documents untouched.

use countertop_core::{Customer, OrderDraft, OrderLine, Product, SavedCartId, VariantId};
use rust_decimal::Decimal;
use tracing::debug;

use crate::cart::{Cart, CartLine, LineKey, Totals, line_display_name};
use crate::error::RegisterError;
use crate::snapshot::SavedCart;
use crate::store::{StateKey, StateStore, StoreError, load_state, save_state};

/// A register's client-owned state, bound to a state store.
pub struct RegisterSession<S: StateStore> {
    store: S,
    tax_rate: Decimal,
    cart: Cart,
    customer: Option<Customer>,
    saved: Vec<SavedCart>,
}

impl<S: StateStore> RegisterSession<S> {
    /// Open a session, restoring any usable prior state from the store.
    ///
    /// Corrupt or out-of-version documents are discarded by the store layer
    /// and load as empty state.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store itself fails (I/O); absent or
    /// unusable state is not an error.
    pub fn open(store: S, tax_rate: Decimal) -> Result<Self, StoreError> {
        let cart = load_state(&store, StateKey::Cart)?.unwrap_or_default();
        let customer = load_state::<Option<Customer>>(&store, StateKey::Customer)?.flatten();
        let saved = load_state(&store, StateKey::SavedCarts)?.unwrap_or_default();

        Ok(Self {
            store,
            tax_rate,
            cart,
            customer,
            saved,
        })
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    #[must_use]
    pub fn saved_carts(&self) -> &[SavedCart] {
        &self.saved
    }

    #[must_use]
    pub const fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Totals for the active cart at the session's tax rate.
    #[must_use]
    pub fn totals(&self) -> Totals {
        self.cart.totals(self.tax_rate)
    }

    /// Add one unit of a product (or one of its variants) to the cart.
    ///
    /// Increments the existing line for the same product/variant pair, or
    /// appends a new line at quantity 1.
    ///
    /// # Errors
    ///
    /// - [`RegisterError::OutOfStock`] when the product has no stock
    /// - [`RegisterError::VariantRequired`] when the product declares
    ///   variants and none was chosen
    /// - [`RegisterError::UnknownVariant`] when the chosen variant is not
    ///   declared by the product
    /// - [`RegisterError::InsufficientStock`] when the increment would push
    ///   the line past the product's stock
    pub fn add_item(
        &mut self,
        product: &Product,
        variant: Option<VariantId>,
    ) -> Result<(), RegisterError> {
        if product.stock == 0 {
            return Err(RegisterError::OutOfStock {
                product: product.id,
            });
        }

        let variant = match variant {
            Some(id) => Some(product.variant(id).ok_or(RegisterError::UnknownVariant {
                product: product.id,
                variant: id,
            })?),
            None if product.has_variants() => {
                return Err(RegisterError::VariantRequired {
                    product: product.id,
                });
            }
            None => None,
        };

        let key = variant.map_or_else(
            || LineKey::bare(product.id),
            |v| LineKey::with_variant(product.id, v.id),
        );

        let requested = self.cart.quantity_of(&key) + 1;
        if requested > product.stock {
            return Err(RegisterError::InsufficientStock {
                requested,
                available: product.stock,
            });
        }

        self.cart.upsert(CartLine {
            key,
            name: line_display_name(&product.name, variant.map(|v| v.name.as_str())),
            unit_price: variant.map_or(product.price, |v| v.price),
            image: product.image.clone(),
            quantity: 1,
        });
        debug!(product = %product.id, quantity = requested, "added item");
        self.persist_cart()?;
        Ok(())
    }

    /// Set a line's quantity, bounded by the owning product's stock.
    ///
    /// Zero behaves as removal. Changing a line the cart does not hold is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::InsufficientStock`] (no mutation) when the
    /// requested quantity exceeds `available`.
    pub fn set_quantity(
        &mut self,
        key: &LineKey,
        quantity: u32,
        available: u32,
    ) -> Result<(), RegisterError> {
        if quantity == 0 {
            return self.remove_line(key).map_err(Into::into);
        }
        if quantity > available {
            return Err(RegisterError::InsufficientStock {
                requested: quantity,
                available,
            });
        }
        if self.cart.set_quantity(key, quantity) {
            self.persist_cart()?;
        }
        Ok(())
    }

    /// Remove a line. Removing an absent line is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cart fails.
    pub fn remove_line(&mut self, key: &LineKey) -> Result<(), StoreError> {
        if self.cart.remove(key) {
            self.persist_cart()?;
        }
        Ok(())
    }

    /// Empty the cart and delete its persisted document.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted document cannot be deleted.
    pub fn clear_cart(&mut self) -> Result<(), StoreError> {
        self.cart.clear();
        self.store.delete(StateKey::Cart)
    }

    /// Select a customer for the sale, or `None` to return to walk-in.
    ///
    /// # Errors
    ///
    /// Returns an error if the selection cannot be persisted.
    pub fn select_customer(&mut self, customer: Option<Customer>) -> Result<(), StoreError> {
        self.customer = customer;
        self.persist_customer()
    }

    /// Park the active cart on the saved-cart shelf.
    ///
    /// A no-op returning `None` when the cart is empty; otherwise appends
    /// exactly one snapshot, empties the active cart, and returns the
    /// snapshot id. The customer selection is unaffected.
    ///
    /// # Errors
    ///
    /// Returns an error if the shelf or the emptied cart cannot be
    /// persisted.
    pub fn save_cart(&mut self) -> Result<Option<SavedCartId>, StoreError> {
        if self.cart.is_empty() {
            return Ok(None);
        }

        let snapshot = SavedCart::capture(&self.cart, self.customer.clone(), self.tax_rate);
        let id = snapshot.id;
        self.saved.push(snapshot);
        self.persist_saved()?;
        self.clear_cart()?;
        debug!(%id, "parked cart");
        Ok(Some(id))
    }

    /// Restore a snapshot as the active cart and selected customer, removing
    /// it from the shelf.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::UnknownSavedCart`] when no snapshot has this
    /// id; the active cart is untouched in that case.
    pub fn load_saved_cart(&mut self, id: SavedCartId) -> Result<(), RegisterError> {
        let position = self
            .saved
            .iter()
            .position(|snapshot| snapshot.id == id)
            .ok_or(RegisterError::UnknownSavedCart { id })?;

        let snapshot = self.saved.remove(position);
        self.cart = Cart::from_lines(snapshot.lines);
        self.customer = snapshot.customer;

        self.persist_saved()?;
        self.persist_cart()?;
        self.persist_customer()?;
        Ok(())
    }

    /// Build the checkout payload from the current cart.
    ///
    /// The cart is left intact; the terminal clears it only once the
    /// back-office accepts the order.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::EmptyCart`] when there is nothing to check
    /// out.
    pub fn order_draft(&self) -> Result<OrderDraft, RegisterError> {
        if self.cart.is_empty() {
            return Err(RegisterError::EmptyCart);
        }

        let totals = self.totals();
        Ok(OrderDraft {
            lines: self
                .cart
                .lines()
                .iter()
                .map(|line| OrderLine {
                    product_id: line.key.product,
                    variant_id: line.key.variant,
                    name: line.name.clone(),
                    unit_price: line.unit_price,
                    quantity: line.quantity,
                    line_total: line.line_total(),
                })
                .collect(),
            customer_id: self.customer.as_ref().map(|customer| customer.id),
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
        })
    }

    fn persist_cart(&self) -> Result<(), StoreError> {
        save_state(&self.store, StateKey::Cart, &self.cart)
    }

    fn persist_customer(&self) -> Result<(), StoreError> {
        save_state(&self.store, StateKey::Customer, &self.customer)
    }

    fn persist_saved(&self) -> Result<(), StoreError> {
        save_state(&self.store, StateKey::SavedCarts, &self.saved)
    }
}
