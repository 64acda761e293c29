//! Cart store and its change notifications.
//!
//! [`CartStore`] owns the session's [`Cart`], applies mutations, persists
//! after each one, and then tells every subscribed [`CartListener`]. Views
//! subscribe instead of being called from inside cart logic, so any number
//! of them can be mounted at once.

mod store;

pub use store::CartStore;

use pineapple_cart_core::{Cart, ProductId};

/// What changed in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// The cart was restored from storage at page load.
    Loaded,
    /// One unit of a product was added.
    ItemAdded {
        /// Product that was added.
        product_id: ProductId,
        /// Product name as shown on the line.
        name: String,
        /// Line quantity after the add.
        quantity: u32,
    },
    /// A product's line was removed.
    ItemRemoved {
        /// Product that was removed.
        product_id: ProductId,
    },
    /// Every line was removed.
    Cleared,
}

impl CartEvent {
    /// Short user-facing notice for this change, if it warrants one.
    #[must_use]
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::ItemAdded { name, .. } => Some(format!("{name} added to cart!")),
            Self::Loaded | Self::ItemRemoved { .. } | Self::Cleared => None,
        }
    }
}

/// Receives the cart after every committed change.
///
/// The cart passed in is the same snapshot for every listener of a given
/// change, taken after the change was persisted.
pub trait CartListener {
    /// Called once per change.
    fn cart_changed(&mut self, cart: &Cart, event: &CartEvent);
}

impl<F> CartListener for F
where
    F: FnMut(&Cart, &CartEvent),
{
    fn cart_changed(&mut self, cart: &Cart, event: &CartEvent) {
        self(cart, event);
    }
}
