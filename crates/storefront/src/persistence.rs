//! Cart persistence adapter.
//!
//! The cart is stored as a JSON array under a single key:
//!
//! ```json
//! [{"id": 1, "name": "Pineapple Tee", "price": 49.99, "quantity": 2}]
//! ```
//!
//! `price` is written as a JSON number carrying the exact decimal digits of
//! the snapshot, and read back from the raw token, so no binary float ever
//! touches it.
//!
//! Loading never fails. Missing or unparseable data yields an empty cart,
//! records for products no longer in the catalog are dropped, and
//! non-essential fields (`name`, `price`, `quantity`) tolerate being
//! missing or malformed. Saving failures are reported to the observability
//! sink while the in-memory cart stays authoritative.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::value::RawValue;
use thiserror::Error;
use tracing::{debug, warn};

use pineapple_cart_core::{Cart, Catalog, LineItem, ProductId};

use crate::error::report_error;
use crate::storage::{KeyValueStore, StorageError};

/// Storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "cart";

/// Errors that can occur when saving the cart.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The backend rejected the write.
    #[error("storage rejected cart write: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be serialized.
    #[error("cart serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Record written for each line.
#[derive(Serialize)]
struct StoredLine<'a> {
    id: ProductId,
    name: &'a str,
    price: Box<RawValue>,
    quantity: u32,
}

/// Record read back for each line.
///
/// Only `id` is required; everything else is checked by hand so a bad
/// value in one field falls back instead of failing the whole load.
#[derive(Deserialize)]
struct StoredRecord {
    id: ProductId,
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    price: Option<Box<RawValue>>,
    #[serde(default)]
    quantity: Option<Value>,
}

/// Loads and saves the cart through a [`KeyValueStore`].
#[derive(Debug)]
pub struct CartPersistence<S> {
    store: S,
}

impl<S: KeyValueStore> CartPersistence<S> {
    /// Wrap a storage backend.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Restore the persisted cart.
    ///
    /// Returns an empty cart if nothing is stored, the store cannot be read,
    /// or the stored value is not an array of records with integer `id`s.
    pub fn load(&self, catalog: &Catalog) -> Cart {
        let raw = match self.store.get(CART_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted cart, starting empty");
                return Cart::new();
            }
        };

        match decode(&raw, catalog) {
            Ok(cart) => cart,
            Err(e) => {
                warn!(error = %e, "Persisted cart is malformed, starting empty");
                Cart::new()
            }
        }
    }

    /// Serialize and write the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the store rejects the write.
    pub fn try_save(&mut self, cart: &Cart) -> Result<(), PersistenceError> {
        let records = cart
            .line_items()
            .iter()
            .map(|line| {
                Ok(StoredLine {
                    id: line.product_id,
                    name: &line.name,
                    price: RawValue::from_string(line.unit_price.to_string())?,
                    quantity: line.quantity,
                })
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()?;

        let json = serde_json::to_string(&records)?;
        self.store.set(CART_STORAGE_KEY, &json)?;
        debug!(lines = records.len(), bytes = json.len(), "Cart saved");
        Ok(())
    }

    /// Write the cart, reporting instead of returning any failure.
    ///
    /// Returns `true` if the write succeeded. No retry is attempted; the
    /// next mutation simply saves again.
    pub fn save(&mut self, cart: &Cart) -> bool {
        match self.try_save(cart) {
            Ok(()) => true,
            Err(e) => {
                report_error(&e, "Failed to persist cart");
                false
            }
        }
    }

    /// Get a reference to the storage backend.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Get a mutable reference to the storage backend.
    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Give back the storage backend.
    pub fn into_inner(self) -> S {
        self.store
    }
}

fn decode(raw: &str, catalog: &Catalog) -> Result<Cart, serde_json::Error> {
    let records: Vec<StoredRecord> = serde_json::from_str(raw)?;
    let mut cart = Cart::new();

    for record in records {
        let Some(product) = catalog.get(record.id) else {
            debug!(product_id = %record.id, "Dropping persisted line for unknown product");
            continue;
        };

        let Some(quantity) = parse_quantity(record.quantity.as_ref()) else {
            debug!(product_id = %record.id, "Dropping persisted line with invalid quantity");
            continue;
        };

        let name = match record.name {
            Some(Value::String(name)) if !name.trim().is_empty() => name,
            _ => product.name.clone(),
        };

        let unit_price = record
            .price
            .as_deref()
            .and_then(parse_price)
            .unwrap_or(product.unit_price);

        let merged = cart.merge(LineItem {
            product_id: product.id,
            name,
            quantity,
            unit_price,
        });
        if !merged {
            debug!(
                product_id = %record.id,
                "Dropping persisted line the cart total cannot hold"
            );
        }
    }

    Ok(cart)
}

/// Missing means one unit; zero, negative, fractional, or non-numeric
/// quantities are rejected.
fn parse_quantity(value: Option<&Value>) -> Option<u32> {
    match value {
        None | Some(Value::Null) => Some(1),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|q| u32::try_from(q).ok())
            .filter(|&q| q > 0),
        Some(_) => None,
    }
}

/// Prices may be JSON numbers or numeric strings; negatives are rejected.
///
/// Numbers are parsed from their raw token, keeping every digit.
fn parse_price(raw: &RawValue) -> Option<Decimal> {
    let token = raw.get();
    let text = if token.starts_with('"') {
        serde_json::from_str::<String>(token).ok()?
    } else {
        token.to_owned()
    };
    let text = text.trim();

    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
        .filter(|price| *price >= Decimal::ZERO)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use pineapple_cart_core::Product;
    use proptest::prelude::*;

    use super::*;
    use crate::storage::MemoryStore;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Product::new(1, "Pineapple Tee", Decimal::new(4999, 2)),
            Product::new(2, "Canvas Tote", Decimal::new(3450, 2)),
            Product::new(3, "Enamel Pin", Decimal::new(1200, 2)),
        ])
        .unwrap()
    }

    fn persistence_with(raw: &str) -> CartPersistence<MemoryStore> {
        let mut store = MemoryStore::new();
        store.set(CART_STORAGE_KEY, raw).unwrap();
        CartPersistence::new(store)
    }

    fn pairs(cart: &Cart) -> Vec<(i32, u32)> {
        cart.line_items()
            .iter()
            .map(|line| (line.product_id.as_i32(), line.quantity))
            .collect()
    }

    #[test]
    fn test_load_missing_is_empty() {
        let persistence = CartPersistence::new(MemoryStore::new());
        assert!(persistence.load(&catalog()).is_empty());
    }

    #[test]
    fn test_round_trip_keeps_lines_and_snapshots() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add(catalog.get(ProductId::new(2)).unwrap());
        cart.add(catalog.get(ProductId::new(1)).unwrap());
        cart.add(catalog.get(ProductId::new(2)).unwrap());

        let mut persistence = CartPersistence::new(MemoryStore::new());
        assert!(persistence.save(&cart));

        let loaded = persistence.load(&catalog);
        assert_eq!(pairs(&loaded), vec![(2, 2), (1, 1)]);
        assert_eq!(loaded, cart);
    }

    #[test]
    fn test_saved_layout() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add(catalog.get(ProductId::new(2)).unwrap());

        let mut persistence = CartPersistence::new(MemoryStore::new());
        persistence.try_save(&cart).unwrap();

        let raw = persistence.store().get(CART_STORAGE_KEY).unwrap().unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{"id": 2, "name": "Canvas Tote", "price": 34.5, "quantity": 1}])
        );
    }

    #[test]
    fn test_load_malformed_is_empty() {
        for raw in ["{not json", "{\"id\": 1}", "[1, 2]", "[{\"name\": \"x\"}]", ""] {
            let persistence = persistence_with(raw);
            assert!(persistence.load(&catalog()).is_empty(), "input: {raw:?}");
        }
    }

    #[test]
    fn test_load_drops_unknown_products() {
        let persistence = persistence_with(
            r#"[{"id": 99, "name": "Retired", "price": 1, "quantity": 4},
                {"id": 1, "name": "Pineapple Tee", "price": 49.99, "quantity": 2}]"#,
        );
        assert_eq!(pairs(&persistence.load(&catalog())), vec![(1, 2)]);
    }

    #[test]
    fn test_load_tolerates_extra_and_missing_fields() {
        let persistence = persistence_with(
            r#"[{"id": 1, "priceId": "price_tee", "color": "yellow"},
                {"id": 2, "name": 7, "price": "34.50", "quantity": 3}]"#,
        );
        let cart = persistence.load(&catalog());

        assert_eq!(pairs(&cart), vec![(1, 1), (2, 3)]);
        let tote = cart.get(ProductId::new(2)).unwrap();
        assert_eq!(tote.name, "Canvas Tote");
        assert_eq!(tote.unit_price, Decimal::new(3450, 2));
    }

    #[test]
    fn test_load_keeps_stored_price_snapshot() {
        let persistence =
            persistence_with(r#"[{"id": 1, "name": "Pineapple Tee", "price": 39.99}]"#);
        let cart = persistence.load(&catalog());
        assert_eq!(
            cart.get(ProductId::new(1)).unwrap().unit_price,
            Decimal::new(3999, 2)
        );
    }

    #[test]
    fn test_load_falls_back_on_bad_price() {
        let persistence = persistence_with(
            r#"[{"id": 1, "price": "free"}, {"id": 2, "price": -5}, {"id": 3, "price": [1]}]"#,
        );
        let cart = persistence.load(&catalog());
        assert_eq!(cart.total(), Decimal::new(9649, 2));
    }

    #[test]
    fn test_load_drops_invalid_quantities() {
        let persistence = persistence_with(
            r#"[{"id": 1, "quantity": 0}, {"id": 2, "quantity": -1},
                {"id": 3, "quantity": 1.5}, {"id": 1, "quantity": "2"}]"#,
        );
        assert!(persistence.load(&catalog()).is_empty());
    }

    #[test]
    fn test_load_merges_duplicate_records() {
        let persistence = persistence_with(
            r#"[{"id": 1, "price": 10, "quantity": 1}, {"id": 2},
                {"id": 1, "price": 20, "quantity": 2}]"#,
        );
        let cart = persistence.load(&catalog());

        assert_eq!(pairs(&cart), vec![(1, 3), (2, 1)]);
        assert_eq!(
            cart.get(ProductId::new(1)).unwrap().unit_price,
            Decimal::from(10)
        );
    }

    #[test]
    fn test_load_unreadable_store_is_empty() {
        let mut persistence = persistence_with(r#"[{"id": 1}]"#);
        persistence.store_mut().set_disabled(true);
        assert!(persistence.load(&catalog()).is_empty());
    }

    #[test]
    fn test_save_failure_is_reported_not_raised() {
        let mut cart = Cart::new();
        cart.add(catalog().get(ProductId::new(1)).unwrap());

        let mut persistence = CartPersistence::new(MemoryStore::with_quota(8));
        assert!(matches!(
            persistence.try_save(&cart),
            Err(PersistenceError::Storage(StorageError::QuotaExceeded { .. }))
        ));
        assert!(!persistence.save(&cart));
        assert_eq!(persistence.store().get(CART_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_save_empty_cart_overwrites() {
        let mut persistence = persistence_with(r#"[{"id": 1, "quantity": 3}]"#);
        assert!(persistence.save(&Cart::new()));
        assert!(persistence.load(&catalog()).is_empty());
        assert_eq!(
            persistence.store().get(CART_STORAGE_KEY).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_load_drops_lines_whose_total_overflows() {
        let persistence = persistence_with(
            r#"[{"id": 1, "price": "79228162514264337593543950335", "quantity": 2}]"#,
        );
        assert!(persistence.load(&catalog()).is_empty());

        let persistence = persistence_with(
            r#"[{"id": 1, "price": 79228162514264337593543950335},
                {"id": 2, "quantity": 4294967295}]"#,
        );
        let cart = persistence.load(&catalog());
        assert_eq!(pairs(&cart), vec![(1, 1)]);
        assert_eq!(cart.total(), Decimal::MAX);
    }

    #[test]
    fn test_page_ready_survives_overflowing_record() {
        use crate::page::{Page, PageController, PageMounts};
        use crate::views::{CartView, RecordingMount};

        let mut store = MemoryStore::new();
        store
            .set(
                CART_STORAGE_KEY,
                r#"[{"id": 1, "price": "79228162514264337593543950335", "quantity": 2}]"#,
            )
            .unwrap();
        let sidebar: RecordingMount<CartView> = RecordingMount::new();

        let page = PageController::ready(
            Page::Catalog,
            Arc::new(catalog()),
            store,
            PageMounts {
                sidebar: Some(Box::new(sidebar.clone())),
                summary: None,
            },
        );

        assert!(page.store().line_items().is_empty());
        assert_eq!(sidebar.latest().unwrap().total, "0.00");
    }

    #[test]
    fn test_round_trip_keeps_every_price_digit() {
        let precise = Decimal::new(12_345_678_901_234_567, 4);
        let catalog = Catalog::new(vec![Product::new(1, "Ledger", precise)]).unwrap();
        let mut cart = Cart::new();
        cart.add(catalog.get(ProductId::new(1)).unwrap());

        let mut persistence = CartPersistence::new(MemoryStore::new());
        persistence.try_save(&cart).unwrap();

        let raw = persistence.store().get(CART_STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains(r#""price":1234567890123.4567"#), "{raw}");

        let loaded = persistence.load(&catalog);
        assert_eq!(loaded.get(ProductId::new(1)).unwrap().unit_price, precise);
    }

    fn priced_catalog(prices: &[(i64, u32)]) -> Catalog {
        Catalog::new(
            prices
                .iter()
                .zip(1..)
                .map(|(&(mantissa, scale), id)| {
                    Product::new(id, format!("Product {id}"), Decimal::new(mantissa, scale))
                })
                .collect(),
        )
        .unwrap()
    }

    proptest! {
        #[test]
        fn prop_save_then_load_keeps_lines(
            prices in prop::collection::vec((0..1_000_000_000_000_i64, 0..=8_u32), 1..6),
            picks in prop::collection::vec(any::<prop::sample::Index>(), 0..40)
        ) {
            let catalog = priced_catalog(&prices);
            let products: Vec<&Product> = catalog.iter().collect();

            let mut cart = Cart::new();
            for pick in &picks {
                prop_assert!(cart.add(pick.get::<&Product>(&products)).is_some());
            }

            let mut persistence = CartPersistence::new(MemoryStore::new());
            prop_assert!(persistence.save(&cart));
            let loaded = persistence.load(&catalog);

            prop_assert_eq!(pairs(&loaded), pairs(&cart));
            prop_assert_eq!(loaded.total(), cart.total());
            for (before, after) in cart.line_items().iter().zip(loaded.line_items()) {
                prop_assert_eq!(before.unit_price, after.unit_price);
            }
        }
    }
}
