//! View renderers.
//!
//! Each renderer is a pure projection from cart state to a display model,
//! plus a thin [`Mount`] adapter that draws the model somewhere. Renderers
//! subscribe to the [`CartStore`](crate::cart::CartStore) as listeners and
//! never mutate it.
//!
//! - [`Sidebar`] - persistent cart list ([`CartView`])
//! - [`Summary`] - checkout order summary ([`OrderSummaryView`])
//! - [`CatalogView`] - product list with one add-to-cart control per product
//!
//! A renderer built without a mount point is a no-op, so the same wiring
//! works on pages that lack one of the targets.

mod cart;
mod catalog;
mod summary;

pub use cart::{CartItemView, CartView, Sidebar};
pub use catalog::{CatalogEntryView, CatalogView};
pub use summary::{OrderSummaryView, Summary, SummaryItemView};

use std::cell::RefCell;
use std::rc::Rc;

/// Placeholder shown instead of rows when the cart is empty.
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty.";

/// Somewhere a display model can be drawn.
pub trait Mount<V> {
    /// Draw the view, replacing whatever was drawn before.
    fn draw(&mut self, view: &V);
}

impl<V, M> Mount<V> for Box<M>
where
    M: Mount<V> + ?Sized,
{
    fn draw(&mut self, view: &V) {
        (**self).draw(view);
    }
}

/// Mount that keeps every frame it is asked to draw.
///
/// Clones share the same frame buffer, so one handle can be given to a
/// renderer while another is kept to inspect what was drawn.
#[derive(Debug)]
pub struct RecordingMount<V> {
    frames: Rc<RefCell<Vec<V>>>,
}

impl<V> RecordingMount<V> {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Number of frames drawn so far.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.borrow().len()
    }
}

impl<V: Clone> RecordingMount<V> {
    /// Most recently drawn frame.
    #[must_use]
    pub fn latest(&self) -> Option<V> {
        self.frames.borrow().last().cloned()
    }

    /// Every frame drawn so far, oldest first.
    #[must_use]
    pub fn frames(&self) -> Vec<V> {
        self.frames.borrow().clone()
    }
}

impl<V> Default for RecordingMount<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for RecordingMount<V> {
    fn clone(&self) -> Self {
        Self {
            frames: Rc::clone(&self.frames),
        }
    }
}

impl<V: Clone> Mount<V> for RecordingMount<V> {
    fn draw(&mut self, view: &V) {
        self.frames.borrow_mut().push(view.clone());
    }
}
