//! Integration tests for Pineapple Cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pineapple-cart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Page loads across the catalog and checkout pages
//! - `persistence` - What survives a save and reload
//!
//! Tests run against the real file-backed store in a throwaway directory
//! per test, so they need no external services.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rust_decimal::Decimal;
use tempfile::TempDir;

use pineapple_cart_core::{Catalog, Product};
use pineapple_cart_storefront::storage::FileStore;

/// Two-product catalog used across the scenarios.
///
/// # Panics
///
/// Panics if the fixture products are rejected by the catalog.
#[must_use]
pub fn catalog() -> Arc<Catalog> {
    Arc::new(
        Catalog::new(vec![
            Product::new(1, "Pineapple Tee", Decimal::new(4999, 2)).with_price_ref("price_tee"),
            Product::new(2, "Canvas Tote", Decimal::new(3450, 2)).with_price_ref("price_tote"),
        ])
        .expect("fixture catalog is valid"),
    )
}

/// Data directory for one scenario, removed when dropped.
#[derive(Debug)]
pub struct TempDataDir {
    dir: TempDir,
}

impl TempDataDir {
    /// # Panics
    ///
    /// Panics if the directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("pineapple-cart-it-")
            .tempdir()
            .expect("Failed to create temp data dir");
        Self { dir }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Open a store on this directory, as a new page load would.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be opened.
    #[must_use]
    pub fn store(&self) -> FileStore {
        FileStore::open(self.dir.path()).expect("Failed to open file store")
    }

    /// Path of the persisted cart file.
    #[must_use]
    pub fn cart_file(&self) -> PathBuf {
        self.dir.path().join("cart.json")
    }
}

impl Default for TempDataDir {
    fn default() -> Self {
        Self::new()
    }
}
