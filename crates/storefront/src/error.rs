//! Unified error handling with Sentry integration.
//!
//! Cart operations never fail the page: errors are logged and captured to
//! Sentry, then the caller carries on with whatever state it has. `AppError`
//! is the umbrella type for the few entry points (startup, the CLI) that do
//! surface failures.

use thiserror::Error;

use crate::checkout::CheckoutClientError;
use crate::config::ConfigError;
use crate::page::PageError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Storage backend could not be opened or used.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Page event was rejected.
    #[error("Page error: {0}")]
    Page(#[from] PageError),

    /// Checkout endpoint call failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutClientError),
}

/// Log an error and capture it to Sentry.
///
/// Used for failures the cart deliberately swallows, so they still reach
/// the observability sink.
pub fn report_error<E>(error: &E, context: &str)
where
    E: std::error::Error + ?Sized,
{
    let event_id = sentry::capture_error(error);
    tracing::error!(
        error = %error,
        sentry_event_id = %event_id,
        "{context}"
    );
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of cart
/// actions leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
