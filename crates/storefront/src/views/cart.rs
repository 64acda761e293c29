//! Cart sidebar renderer.

use pineapple_cart_core::{Cart, LineItem, ProductId, format_amount};

use super::{EMPTY_CART_MESSAGE, Mount};
use crate::cart::{CartEvent, CartListener};

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    /// Id the row's remove control carries back.
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    /// Unit price times quantity, two decimals.
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    /// Rows in insertion order.
    pub items: Vec<CartItemView>,
    /// Cart total, two decimals.
    pub total: String,
    /// Sum of quantities across rows.
    pub item_count: u32,
    /// Set instead of rows when the cart is empty.
    pub placeholder: Option<&'static str>,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: format_amount(rust_decimal::Decimal::ZERO),
            item_count: 0,
            placeholder: Some(EMPTY_CART_MESSAGE),
        }
    }

    /// Returns `true` if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&LineItem> for CartItemView {
    fn from(line: &LineItem) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            quantity: line.quantity,
            line_price: format_amount(line.subtotal()),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        if cart.is_empty() {
            return Self::empty();
        }

        Self {
            items: cart.line_items().iter().map(CartItemView::from).collect(),
            total: format_amount(cart.total()),
            item_count: cart.item_count(),
            placeholder: None,
        }
    }
}

/// Renders the cart into an optional sidebar mount.
#[derive(Debug)]
pub struct Sidebar<M> {
    mount: Option<M>,
}

impl<M: Mount<CartView>> Sidebar<M> {
    /// Create a sidebar renderer. `None` means the page has no sidebar.
    pub const fn new(mount: Option<M>) -> Self {
        Self { mount }
    }

    /// Project the cart and draw it, if mounted.
    pub fn render(&mut self, cart: &Cart) {
        if let Some(mount) = self.mount.as_mut() {
            mount.draw(&CartView::from(cart));
        }
    }
}

impl<M: Mount<CartView>> CartListener for Sidebar<M> {
    fn cart_changed(&mut self, cart: &Cart, _event: &CartEvent) {
        self.render(cart);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use pineapple_cart_core::Product;

    use super::*;
    use crate::views::RecordingMount;

    fn cart() -> Cart {
        let tee = Product::new(1, "Pineapple Tee", Decimal::new(4999, 2));
        let tote = Product::new(2, "Canvas Tote", Decimal::new(3450, 2));
        let mut cart = Cart::new();
        cart.add(&tee);
        cart.add(&tee);
        cart.add(&tote);
        cart
    }

    #[test]
    fn test_empty_cart_shows_placeholder() {
        let view = CartView::from(&Cart::new());
        assert!(view.is_empty());
        assert_eq!(view.placeholder, Some("Your cart is empty."));
        assert_eq!(view.total, "0.00");
        assert_eq!(view.item_count, 0);
    }

    #[test]
    fn test_rows_follow_cart_order() {
        let view = CartView::from(&cart());

        assert_eq!(view.placeholder, None);
        assert_eq!(
            view.items,
            vec![
                CartItemView {
                    product_id: ProductId::new(1),
                    name: "Pineapple Tee".to_string(),
                    quantity: 2,
                    line_price: "99.98".to_string(),
                },
                CartItemView {
                    product_id: ProductId::new(2),
                    name: "Canvas Tote".to_string(),
                    quantity: 1,
                    line_price: "34.50".to_string(),
                },
            ]
        );
        assert_eq!(view.total, "134.48");
        assert_eq!(view.item_count, 3);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let cart = cart();
        assert_eq!(CartView::from(&cart), CartView::from(&cart));
    }

    #[test]
    fn test_sidebar_draws_into_mount() {
        let mount = RecordingMount::new();
        let mut sidebar = Sidebar::new(Some(mount.clone()));
        sidebar.render(&cart());

        assert_eq!(mount.frame_count(), 1);
        assert_eq!(mount.latest().unwrap().total, "134.48");
    }

    #[test]
    fn test_unmounted_sidebar_is_noop() {
        let mut sidebar: Sidebar<RecordingMount<CartView>> = Sidebar::new(None);
        sidebar.render(&cart());
        sidebar.cart_changed(&cart(), &CartEvent::Loaded);
    }
}
