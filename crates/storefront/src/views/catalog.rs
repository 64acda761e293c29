//! Catalog renderer.

use pineapple_cart_core::{Catalog, Product, ProductId, format_price};

/// One product with its add-to-cart control.
///
/// `product_id` is the structured data the control carries back when
/// clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntryView {
    pub product_id: ProductId,
    pub name: String,
    /// Display price with currency symbol.
    pub price: String,
}

/// Product list display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogView {
    /// Products in catalog order.
    pub entries: Vec<CatalogEntryView>,
}

impl From<&Product> for CatalogEntryView {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: format_price(product.unit_price),
        }
    }
}

impl From<&Catalog> for CatalogView {
    fn from(catalog: &Catalog) -> Self {
        Self {
            entries: catalog.iter().map(CatalogEntryView::from).collect(),
        }
    }
}
