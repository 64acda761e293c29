//! Pineapple Cart Core - Shared cart types library.
//!
//! This crate provides the types used by every Pineapple Cart component:
//! - `storefront` - Cart store, persistence, renderers, and page controller
//! - `cli` - Command-line driver that replays page loads against local storage
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and money formatting
//! - [`catalog`] - Static product reference data
//! - [`cart`] - Line items and the merge-by-id cart
//! - [`checkout`] - Outbound checkout request payload

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod types;

pub use cart::{Cart, LineItem};
pub use catalog::{Catalog, CatalogError, Product};
pub use checkout::{CheckoutError, CheckoutLine, CheckoutRequest};
pub use types::*;
