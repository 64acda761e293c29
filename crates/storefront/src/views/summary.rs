//! Checkout order summary renderer.

use pineapple_cart_core::{Cart, LineItem, ProductId, format_amount};

use super::{EMPTY_CART_MESSAGE, Mount};
use crate::cart::{CartEvent, CartListener};

/// Order summary line display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryItemView {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    /// Price snapshot taken when the line was first added.
    pub unit_price: String,
    /// `unit_price` times `quantity`.
    pub line_price: String,
}

/// Order summary display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummaryView {
    pub items: Vec<SummaryItemView>,
    /// Sum of quantities across rows.
    pub item_count: u32,
    /// Order total, two decimals.
    pub total: String,
    /// Set instead of rows when the cart is empty.
    pub placeholder: Option<&'static str>,
}

impl From<&LineItem> for SummaryItemView {
    fn from(line: &LineItem) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price: format_amount(line.unit_price),
            line_price: format_amount(line.subtotal()),
        }
    }
}

impl From<&Cart> for OrderSummaryView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.line_items().iter().map(SummaryItemView::from).collect(),
            item_count: cart.item_count(),
            total: format_amount(cart.total()),
            placeholder: cart.is_empty().then_some(EMPTY_CART_MESSAGE),
        }
    }
}

/// Renders the order summary into an optional mount.
#[derive(Debug)]
pub struct Summary<M> {
    mount: Option<M>,
}

impl<M: Mount<OrderSummaryView>> Summary<M> {
    /// Create a summary renderer. `None` means the page has no summary.
    pub const fn new(mount: Option<M>) -> Self {
        Self { mount }
    }

    /// Project the cart and draw it, if mounted.
    pub fn render(&mut self, cart: &Cart) {
        if let Some(mount) = self.mount.as_mut() {
            mount.draw(&OrderSummaryView::from(cart));
        }
    }
}

impl<M: Mount<OrderSummaryView>> CartListener for Summary<M> {
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

    #[test]
    fn test_summary_rows_and_total() {
        let pin = Product::new(3, "Enamel Pin", Decimal::new(1200, 2));
        let mut cart = Cart::new();
        cart.add(&pin);
        cart.add(&pin);
        cart.add(&pin);

        let view = OrderSummaryView::from(&cart);
        assert_eq!(view.placeholder, None);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.total, "36.00");

        let row = view.items.first().unwrap();
        assert_eq!(row.unit_price, "12.00");
        assert_eq!(row.line_price, "36.00");
        assert_eq!(row.quantity, 3);
    }

    #[test]
    fn test_empty_summary() {
        let view = OrderSummaryView::from(&Cart::new());
        assert!(view.items.is_empty());
        assert_eq!(view.total, "0.00");
        assert_eq!(view.placeholder, Some(EMPTY_CART_MESSAGE));
    }

    #[test]
    fn test_summary_listener_draws_each_change() {
        let mount = RecordingMount::new();
        let mut summary = Summary::new(Some(mount.clone()));

        let mut cart = Cart::new();
        summary.cart_changed(&cart, &CartEvent::Loaded);
        cart.add(&Product::new(1, "Pineapple Tee", Decimal::new(4999, 2)));
        summary.cart_changed(&cart, &CartEvent::Loaded);

        let totals: Vec<String> = mount.frames().into_iter().map(|f| f.total).collect();
        assert_eq!(totals, vec!["0.00".to_string(), "49.99".to_string()]);
    }
}
