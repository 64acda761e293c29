//! Static product reference data.
//!
//! The catalog is built once at process start and never mutated afterwards.
//! Cart operations only ever look products up by [`ProductId`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ProductId;

/// Errors that can occur when building a [`Catalog`].
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Product IDs must be positive integers.
    #[error("product id must be positive (got {0})")]
    InvalidId(ProductId),
    /// Two products share the same ID.
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
    /// Unit prices cannot be negative.
    #[error("product {id} has a negative price ({price})")]
    NegativePrice {
        /// Offending product.
        id: ProductId,
        /// Offending price.
        price: Decimal,
    },
    /// Product names cannot be blank.
    #[error("product {0} has an empty name")]
    EmptyName(ProductId),
    /// Catalog JSON could not be parsed.
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique, positive product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current unit price in the store's currency.
    #[serde(alias = "price")]
    pub unit_price: Decimal,
    /// External price reference sent with checkout requests (e.g. `price_1Nx...`).
    #[serde(default, alias = "priceId", skip_serializing_if = "Option::is_none")]
    pub price_ref: Option<String>,
}

impl Product {
    /// Create a product without an external price reference.
    #[must_use]
    pub fn new(id: i32, name: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.into(),
            unit_price,
            price_ref: None,
        }
    }

    /// Attach an external price reference.
    #[must_use]
    pub fn with_price_ref(mut self, price_ref: impl Into<String>) -> Self {
        self.price_ref = Some(price_ref.into());
        self
    }
}

/// The read-only list of purchasable products, in display order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, validating every product.
    ///
    /// # Errors
    ///
    /// Returns an error if any product has a non-positive or duplicate ID,
    /// a negative price, or an empty name.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        for (index, product) in products.iter().enumerate() {
            if product.id.as_i32() <= 0 {
                return Err(CatalogError::InvalidId(product.id));
            }
            if product.unit_price < Decimal::ZERO {
                return Err(CatalogError::NegativePrice {
                    id: product.id,
                    price: product.unit_price,
                });
            }
            if product.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(product.id));
            }
            if products
                .iter()
                .take(index)
                .any(|earlier| earlier.id == product.id)
            {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }

        Ok(Self { products })
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a product fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Returns `true` if the catalog contains the given product.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate over products in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns `true` if the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
