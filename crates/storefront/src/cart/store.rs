//! The session's cart store.

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use pineapple_cart_core::{Cart, Catalog, LineItem, ProductId};

use super::{CartEvent, CartListener};
use crate::error::add_breadcrumb;
use crate::persistence::CartPersistence;
use crate::storage::KeyValueStore;

/// Single source of truth for the current session's cart.
///
/// Every successful mutation runs in the same order: change the cart,
/// persist it, notify listeners. Calls that change nothing (unknown product,
/// removing an absent line) skip both persistence and notification.
///
/// The store is single-threaded by construction (`&mut self` on every
/// mutation). Sharing it across threads requires wrapping it in a lock.
pub struct CartStore<S> {
    cart: Cart,
    catalog: Arc<Catalog>,
    persistence: CartPersistence<S>,
    listeners: Vec<Box<dyn CartListener>>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Restore the persisted cart and build a store around it.
    ///
    /// Listeners are not notified; call [`CartStore::refresh`] once they
    /// are subscribed.
    pub fn load(catalog: Arc<Catalog>, storage: S) -> Self {
        let persistence = CartPersistence::new(storage);
        let cart = persistence.load(&catalog);
        info!(
            lines = cart.line_items().len(),
            items = cart.item_count(),
            "Cart loaded"
        );

        Self {
            cart,
            catalog,
            persistence,
            listeners: Vec::new(),
        }
    }

    /// Subscribe a listener to future changes.
    pub fn subscribe(&mut self, listener: impl CartListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Notify listeners of the current state without changing it.
    pub fn refresh(&mut self) {
        self.notify(&CartEvent::Loaded);
    }

    /// Add one unit of a catalog product.
    ///
    /// Unknown products, and adds the cart total could not represent, are
    /// ignored (logged, not persisted, not rendered). Returns the affected
    /// line.
    #[instrument(skip(self))]
    pub fn add_item(&mut self, product_id: ProductId) -> Option<&LineItem> {
        let Some(product) = self.catalog.get(product_id) else {
            warn!(%product_id, "Ignoring add for unknown product");
            return None;
        };

        let Some(line) = self.cart.add(product) else {
            warn!(%product_id, "Ignoring add that would overflow the cart total");
            return None;
        };
        let event = CartEvent::ItemAdded {
            product_id,
            name: line.name.clone(),
            quantity: line.quantity,
        };
        debug!(%product_id, quantity = line.quantity, "Item added");
        add_breadcrumb(
            "cart",
            "Added item",
            Some(&[("product_id", product_id.to_string().as_str())]),
        );

        self.commit(&event);
        self.cart.get(product_id)
    }

    /// Remove a product's line. Absent products are a no-op.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, product_id: ProductId) -> Option<LineItem> {
        let removed = self.cart.remove(product_id)?;
        debug!(%product_id, quantity = removed.quantity, "Item removed");
        add_breadcrumb(
            "cart",
            "Removed item",
            Some(&[("product_id", product_id.to_string().as_str())]),
        );

        self.commit(&CartEvent::ItemRemoved { product_id });
        Some(removed)
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.cart.clear();
        add_breadcrumb("cart", "Cleared cart", None);
        self.commit(&CartEvent::Cleared);
    }

    /// Unrounded cart total.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cart.total()
    }

    /// Lines in first-added order.
    #[must_use]
    pub fn line_items(&self) -> &[LineItem] {
        self.cart.line_items()
    }

    /// Get a reference to the cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Get a reference to the catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get a reference to the storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        self.persistence.store()
    }

    /// Get a mutable reference to the storage backend.
    pub const fn storage_mut(&mut self) -> &mut S {
        self.persistence.store_mut()
    }

    /// Drop the store and give back its storage backend.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.persistence.into_inner()
    }

    fn commit(&mut self, event: &CartEvent) {
        self.persistence.save(&self.cart);
        self.notify(event);
    }

    fn notify(&mut self, event: &CartEvent) {
        for listener in &mut self.listeners {
            listener.cart_changed(&self.cart, event);
        }
    }
}

impl<S> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
