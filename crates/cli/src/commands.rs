//! Command implementations.
//!
//! Each command brings up one page against the file-backed store, applies
//! its events, and lets the page save as it goes.

use std::sync::Arc;

use tracing::{info, warn};

use pineapple_cart_core::ProductId;
use pineapple_cart_storefront::checkout::CheckoutClient;
use pineapple_cart_storefront::config::CartConfig;
use pineapple_cart_storefront::error::AppError;
use pineapple_cart_storefront::page::{Page, PageController, PageEvent, PageMounts};
use pineapple_cart_storefront::storage::FileStore;

use crate::terminal::{self, Terminal};

fn open_page(
    config: &CartConfig,
    page: Page,
    mounts: PageMounts,
) -> Result<PageController<FileStore>, AppError> {
    let catalog = Arc::new(config.load_catalog()?);
    let storage = FileStore::open(&config.data_dir)?;
    Ok(PageController::ready(page, catalog, storage, mounts))
}

/// List the catalog.
pub fn catalog(config: &CartConfig) -> Result<(), AppError> {
    let page = open_page(config, Page::Catalog, PageMounts::default())?;
    if let Some(view) = page.catalog_view() {
        terminal::print_catalog(view);
    }
    Ok(())
}

/// Click add-to-cart once per id.
pub fn add(config: &CartConfig, ids: &[ProductId]) -> Result<(), AppError> {
    let mut page = open_page(config, Page::Catalog, PageMounts::default())?;
    page.subscribe(terminal::print_notice);

    for &id in ids {
        if !page.store().catalog().contains(id) {
            terminal::print_line(&format!("No product with id {id}"));
        }
        page.handle(PageEvent::AddToCart(id))?;
    }
    Ok(())
}

/// Click a line's remove control.
pub fn remove(config: &CartConfig, id: ProductId) -> Result<(), AppError> {
    let mut page = open_page(config, Page::Catalog, PageMounts::default())?;

    match page.store().cart().get(id).map(|line| line.name.clone()) {
        Some(name) => {
            page.handle(PageEvent::RemoveFromCart(id))?;
            terminal::print_line(&format!("{name} removed from cart"));
        }
        None => terminal::print_line(&format!("Product {id} is not in the cart")),
    }
    Ok(())
}

/// Draw the cart sidebar.
pub fn show(config: &CartConfig) -> Result<(), AppError> {
    let mounts = PageMounts {
        sidebar: Some(Box::new(Terminal)),
        summary: None,
    };
    open_page(config, Page::Catalog, mounts)?;
    Ok(())
}

/// Review the order summary, or place the order.
///
/// With a checkout endpoint configured the cart is cleared only after the
/// endpoint accepts the order; a failed call leaves it untouched.
pub async fn checkout(config: &CartConfig, confirm: bool) -> Result<(), AppError> {
    if !confirm {
        let mounts = PageMounts {
            sidebar: None,
            summary: Some(Box::new(Terminal)),
        };
        let page = open_page(config, Page::Checkout, mounts)?;
        if !page.store().cart().is_empty() {
            terminal::print_line("Run with --confirm to place the order.");
        }
        return Ok(());
    }

    let mut page = open_page(config, Page::Checkout, PageMounts::default())?;
    let request = page.begin_checkout()?;

    let Some(endpoint) = config.checkout_endpoint.clone() else {
        info!("No checkout endpoint configured, confirming locally");
        let ack = page.complete_checkout()?;
        terminal::print_acknowledgment(&ack);
        return Ok(());
    };

    let client = CheckoutClient::new(endpoint)?;
    match client.create_session(&request).await {
        Ok(session) => {
            let ack = page.complete_checkout()?;
            terminal::print_acknowledgment(&ack);
            terminal::print_line(&format!("Continue to payment: {}", session.url));
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Checkout request failed, cart kept");
            terminal::print_line("Checkout failed. Your cart has been kept.");
            Err(e.into())
        }
    }
}
