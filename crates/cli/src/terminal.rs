//! Terminal output: mount points and notices drawn to stdout.

#![allow(clippy::print_stdout)]

use pineapple_cart_core::Cart;
use pineapple_cart_storefront::cart::CartEvent;
use pineapple_cart_storefront::page::PurchaseAcknowledgment;
use pineapple_cart_storefront::views::{CartView, CatalogView, Mount, OrderSummaryView};

/// Mount point that prints each frame to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct Terminal;

impl Mount<CartView> for Terminal {
    fn draw(&mut self, view: &CartView) {
        if let Some(placeholder) = view.placeholder {
            println!("{placeholder}");
            return;
        }

        println!("Cart ({} items)", view.item_count);
        for item in &view.items {
            println!("  {} x {:<24} {:>10}", item.quantity, item.name, item.line_price);
        }
        println!("Total: ${}", view.total);
    }
}

impl Mount<OrderSummaryView> for Terminal {
    fn draw(&mut self, view: &OrderSummaryView) {
        println!("Order summary");
        if let Some(placeholder) = view.placeholder {
            println!("  {placeholder}");
            return;
        }

        for item in &view.items {
            println!(
                "  {:<24} {:>3} @ {:>8} {:>10}",
                item.name, item.quantity, item.unit_price, item.line_price
            );
        }
        println!("  {} item(s), total ${}", view.item_count, view.total);
    }
}

/// Print the product list with the ids `add` accepts.
pub fn print_catalog(view: &CatalogView) {
    for entry in &view.entries {
        println!("  [{}] {:<24} {:>10}", entry.product_id, entry.name, entry.price);
    }
}

/// Cart listener that prints transient notices such as "X added to cart!".
pub fn print_notice(_cart: &Cart, event: &CartEvent) {
    if let Some(notice) = event.notice() {
        println!("{notice}");
    }
}

/// Print the thank-you message after a placed order.
pub fn print_acknowledgment(ack: &PurchaseAcknowledgment) {
    println!("{}", ack.message);
}

/// Print a plain status line.
pub fn print_line(line: &str) {
    println!("{line}");
}
