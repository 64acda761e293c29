//! Pineapple Cart Storefront library.
//!
//! Client-side cart management for the storefront: the session's cart
//! store, its persistence across page loads, the views that project it,
//! and the page controller that wires them together.
//!
//! # Data flow
//!
//! ```text
//! PageController::ready
//!   -> CartPersistence::load      (restore the cart, never fails)
//!   -> CartStore mutations        (add / remove / clear)
//!   -> CartPersistence::save      (after every mutation)
//!   -> CartListener renderers     (Sidebar, Summary)
//! ```
//!
//! # Modules
//!
//! - [`cart`] - Cart store and change notifications
//! - [`persistence`] - Load/save of the cart under a fixed storage key
//! - [`storage`] - Key-value storage backends
//! - [`views`] - Display models and mount adapters
//! - [`page`] - Catalog/checkout page controller
//! - [`checkout`] - Hosted checkout endpoint client
//! - [`config`] - Environment configuration
//! - [`telemetry`] - Tracing and Sentry setup

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod page;
pub mod persistence;
pub mod storage;
pub mod telemetry;
pub mod views;
