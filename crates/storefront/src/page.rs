//! Page controller.
//!
//! A page is either the catalog or the checkout page, decided once when the
//! page becomes ready. Every page load starts from the persisted cart, so
//! there is no in-session navigation to handle.
//!
//! ```text
//! Catalog:  ready -> Browsing  (add / remove)
//! Checkout: ready -> Reviewing (remove, begin/complete checkout) -> Purchased
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use pineapple_cart_core::{Catalog, CheckoutError, CheckoutRequest, ProductId, format_amount};

use crate::cart::{CartListener, CartStore};
use crate::storage::KeyValueStore;
use crate::views::{CartView, CatalogView, Mount, OrderSummaryView, Sidebar, Summary};

/// Which page is being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Product list with add-to-cart controls and the cart sidebar.
    Catalog,
    /// Order summary and the place-order action.
    Checkout,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog => write!(f, "catalog"),
            Self::Checkout => write!(f, "checkout"),
        }
    }
}

impl FromStr for Page {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "catalog" => Ok(Self::Catalog),
            "checkout" => Ok(Self::Checkout),
            _ => Err(PageError::UnknownPage(s.to_string())),
        }
    }
}

/// Where the page is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// Catalog page, cart editable.
    Browsing,
    /// Checkout page, awaiting confirmation.
    Reviewing,
    /// Checkout completed; the cart is frozen until the next page load.
    Purchased,
}

/// A user interaction delivered to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// An add-to-cart control was clicked.
    AddToCart(ProductId),
    /// A line's remove control was clicked.
    RemoveFromCart(ProductId),
}

/// Errors returned when the page rejects an interaction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    /// Page name did not parse.
    #[error("unknown page: {0}")]
    UnknownPage(String),

    /// Add-to-cart clicked somewhere other than the catalog page.
    #[error("add-to-cart controls are only bound on the catalog page")]
    NotOnCatalogPage,

    /// Checkout started somewhere other than the checkout page.
    #[error("checkout is only available on the checkout page")]
    NotOnCheckoutPage,

    /// Checkout started with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// This page load already placed its order.
    #[error("checkout already completed; reload the page to shop again")]
    CheckoutComplete,
}

impl From<CheckoutError> for PageError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::EmptyCart => Self::EmptyCart,
        }
    }
}

/// Mount points present on the page. Absent ones are `None`.
#[derive(Default)]
pub struct PageMounts {
    /// Cart sidebar mount.
    pub sidebar: Option<Box<dyn Mount<CartView>>>,
    /// Checkout order summary mount.
    pub summary: Option<Box<dyn Mount<OrderSummaryView>>>,
}

impl fmt::Debug for PageMounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageMounts")
            .field("sidebar", &self.sidebar.is_some())
            .field("summary", &self.summary.is_some())
            .finish()
    }
}

/// Shown after a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseAcknowledgment {
    /// Units purchased.
    pub item_count: u32,
    /// Amount charged, two decimals.
    pub total: String,
    /// Thank-you text shown to the shopper.
    pub message: String,
}

/// Drives one page load.
#[derive(Debug)]
pub struct PageController<S> {
    page: Page,
    state: PageState,
    store: CartStore<S>,
    catalog_view: Option<CatalogView>,
}

impl<S: KeyValueStore> PageController<S> {
    /// Bring a page up: restore the cart, wire renderers to the present
    /// mount points, and draw the initial state.
    #[instrument(skip(catalog, storage, mounts))]
    pub fn ready(page: Page, catalog: Arc<Catalog>, storage: S, mounts: PageMounts) -> Self {
        let mut store = CartStore::load(Arc::clone(&catalog), storage);
        store.subscribe(Sidebar::new(mounts.sidebar));
        store.subscribe(Summary::new(mounts.summary));

        let (state, catalog_view) = match page {
            Page::Catalog => (PageState::Browsing, Some(CatalogView::from(&*catalog))),
            Page::Checkout => (PageState::Reviewing, None),
        };

        store.refresh();
        info!(%page, items = store.cart().item_count(), "Page ready");

        Self {
            page,
            state,
            store,
            catalog_view,
        }
    }

    /// Apply a user interaction.
    ///
    /// Unknown products and removals of absent lines succeed without
    /// changing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the page is past checkout, or an add arrives on
    /// a page without add-to-cart controls.
    pub fn handle(&mut self, event: PageEvent) -> Result<(), PageError> {
        if self.state == PageState::Purchased {
            return Err(PageError::CheckoutComplete);
        }

        match event {
            PageEvent::AddToCart(product_id) => {
                if self.page != Page::Catalog {
                    return Err(PageError::NotOnCatalogPage);
                }
                self.store.add_item(product_id);
            }
            PageEvent::RemoveFromCart(product_id) => {
                self.store.remove_item(product_id);
            }
        }

        Ok(())
    }

    /// Register an extra listener, e.g. for transient notices.
    pub fn subscribe(&mut self, listener: impl CartListener + 'static) {
        self.store.subscribe(listener);
    }

    /// Build the outbound checkout request from the current cart.
    ///
    /// The caller sends it; on success it calls
    /// [`PageController::complete_checkout`], on failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns an error if this is not the checkout page, checkout already
    /// completed, or the cart is empty.
    pub fn begin_checkout(&self) -> Result<CheckoutRequest, PageError> {
        self.ensure_reviewing()?;
        Ok(CheckoutRequest::from_cart(
            self.store.cart(),
            self.store.catalog(),
        )?)
    }

    /// Confirm the purchase: empty the cart and freeze the page.
    ///
    /// # Errors
    ///
    /// Returns an error if this is not the checkout page, checkout already
    /// completed, or the cart is empty.
    #[instrument(skip(self))]
    pub fn complete_checkout(&mut self) -> Result<PurchaseAcknowledgment, PageError> {
        self.ensure_reviewing()?;

        let cart = self.store.cart();
        if cart.is_empty() {
            return Err(PageError::EmptyCart);
        }

        let item_count = cart.item_count();
        let total = format_amount(cart.total());
        let message = format!("Thank you! {item_count} item(s) ordered for ${total}.");

        self.store.clear();
        self.state = PageState::Purchased;
        info!(item_count, %total, "Checkout completed");

        Ok(PurchaseAcknowledgment {
            item_count,
            total,
            message,
        })
    }

    /// Which page this is.
    #[must_use]
    pub const fn page(&self) -> Page {
        self.page
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> PageState {
        self.state
    }

    /// Product list rendered on the catalog page.
    #[must_use]
    pub const fn catalog_view(&self) -> Option<&CatalogView> {
        self.catalog_view.as_ref()
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub const fn store(&self) -> &CartStore<S> {
        &self.store
    }

    /// End the page and give back its storage backend.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.store.into_storage()
    }

    fn ensure_reviewing(&self) -> Result<(), PageError> {
        match (self.page, self.state) {
            (Page::Catalog, _) => Err(PageError::NotOnCheckoutPage),
            (Page::Checkout, PageState::Purchased) => Err(PageError::CheckoutComplete),
            (Page::Checkout, _) => Ok(()),
        }
    }
}
