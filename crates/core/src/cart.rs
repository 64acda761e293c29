//! The shopping cart value type.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s, at most one per product,
//! kept in the order products were first added. Quantities never drop to
//! zero; removing a product deletes its line outright.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::ProductId;

/// One catalog product plus the quantity of it currently in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Product name captured when the line was created.
    pub name: String,
    /// Number of units, always at least 1.
    pub quantity: u32,
    /// Unit price captured when the line was created.
    ///
    /// Later catalog price changes do not affect an existing line.
    pub unit_price: Decimal,
}

impl LineItem {
    /// Start a new line for a product with quantity 1 at its current price.
    #[must_use]
    pub fn snapshot(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            quantity: 1,
            unit_price: product.unit_price,
        }
    }

    /// Unrounded `quantity * unit_price`.
    ///
    /// Lines held by a [`Cart`] always have a representable subtotal.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// `quantity * unit_price`, or `None` if it does not fit in a `Decimal`.
    #[must_use]
    pub fn checked_subtotal(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Ordered collection of line items keyed by product ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of a product.
    ///
    /// Increments the existing line if there is one (keeping its original
    /// price snapshot), otherwise appends a new line at the current price.
    /// Returns `None` and leaves the cart unchanged if the price is negative
    /// or the new total would not be representable.
    #[allow(clippy::indexing_slicing)] // index comes from position() or the push below
    pub fn add(&mut self, product: &Product) -> Option<&LineItem> {
        let index = match self.position(product.id) {
            Some(index) => {
                let mut line = self.lines[index].clone();
                line.quantity = line.quantity.checked_add(1)?;
                self.total_with(Some(index), &line)?;
                self.lines[index] = line;
                index
            }
            None => {
                let line = LineItem::snapshot(product);
                self.total_with(None, &line)?;
                self.lines.push(line);
                self.lines.len() - 1
            }
        };

        Some(&self.lines[index])
    }

    /// Fold a previously stored line into the cart.
    ///
    /// Lines for a product already present add their quantity to the
    /// existing line; the first snapshot wins. Returns `false` without
    /// changing anything for zero-quantity or negatively priced lines and
    /// for lines that would push the total past what a `Decimal` can hold.
    #[allow(clippy::indexing_slicing)] // index comes from position()
    pub fn merge(&mut self, line: LineItem) -> bool {
        if line.quantity == 0 {
            return false;
        }

        match self.position(line.product_id) {
            Some(index) => {
                let mut merged = self.lines[index].clone();
                let Some(quantity) = merged.quantity.checked_add(line.quantity) else {
                    return false;
                };
                merged.quantity = quantity;
                if self.total_with(Some(index), &merged).is_none() {
                    return false;
                }
                self.lines[index] = merged;
            }
            None => {
                if self.total_with(None, &line).is_none() {
                    return false;
                }
                self.lines.push(line);
            }
        }
        true
    }

    /// Remove the line for a product, returning it if present.
    pub fn remove(&mut self, id: ProductId) -> Option<LineItem> {
        self.position(id).map(|index| self.lines.remove(index))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.lines.iter().find(|line| line.product_id == id)
    }

    /// Lines in first-added order.
    #[must_use]
    pub fn line_items(&self) -> &[LineItem] {
        &self.lines
    }

    /// Sum of every line subtotal, unrounded.
    ///
    /// Every line was admitted by `add` or `merge` against this total, so
    /// the sum stays representable.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(LineItem::subtotal).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Returns `true` if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.lines.iter().position(|line| line.product_id == id)
    }

    /// Total the cart would have with `line` in place of the line at
    /// `replacing` (or appended), if it is representable.
    fn total_with(&self, replacing: Option<usize>, line: &LineItem) -> Option<Decimal> {
        if line.unit_price < Decimal::ZERO {
            return None;
        }
        self.lines
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != replacing)
            .try_fold(line.checked_subtotal()?, |total, (_, other)| {
                total.checked_add(other.checked_subtotal()?)
            })
    }
}
