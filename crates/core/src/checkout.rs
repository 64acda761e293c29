//! Outbound checkout request payload.
//!
//! The checkout endpoint receives one entry per cart line with an external
//! price reference and a quantity:
//!
//! ```json
//! {"lineItems": [{"price": "price_tee", "quantity": 2}]}
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::catalog::Catalog;

/// Errors that can occur when building a [`CheckoutRequest`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutError {
    /// There is nothing to check out.
    #[error("cart is empty")]
    EmptyCart,
}

/// One entry in a checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLine {
    /// External price reference for the product.
    pub price: String,
    /// Number of units.
    pub quantity: u32,
}

/// Payload posted to the checkout endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Lines in cart order.
    pub line_items: Vec<CheckoutLine>,
}

impl CheckoutRequest {
    /// Build a request from the cart's lines.
    ///
    /// Each line uses its product's `price_ref`. Products without one, or
    /// lines whose product has since left the catalog, fall back to the
    /// product ID.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
    pub fn from_cart(cart: &Cart, catalog: &Catalog) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let line_items = cart
            .line_items()
            .iter()
            .map(|line| CheckoutLine {
                price: catalog
                    .get(line.product_id)
                    .and_then(|product| product.price_ref.clone())
                    .unwrap_or_else(|| line.product_id.to_string()),
                quantity: line.quantity,
            })
            .collect();

        Ok(Self { line_items })
    }
}
