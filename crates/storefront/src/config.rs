//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CART_DATA_DIR` - Directory holding persisted cart state (default: `.cart`)
//! - `CART_CATALOG_PATH` - JSON product catalog (default: built-in catalog)
//! - `CHECKOUT_ENDPOINT` - URL that creates hosted checkout sessions
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

use pineapple_cart_core::{Catalog, CatalogError, Product};

/// Default directory for persisted cart state.
pub const DEFAULT_DATA_DIR: &str = ".cart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Variable name and the reason its value was rejected.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    /// Catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Catalog file parsed but its products were rejected.
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Directory for the file-backed cart store
    pub data_dir: PathBuf,
    /// JSON catalog file; `None` uses the built-in catalog
    pub catalog_path: Option<PathBuf>,
    /// Hosted checkout endpoint; `None` confirms checkout locally
    pub checkout_endpoint: Option<Url>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let data_dir = get("CART_DATA_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);
        let catalog_path = get("CART_CATALOG_PATH").map(PathBuf::from);
        let checkout_endpoint = get("CHECKOUT_ENDPOINT")
            .map(|raw| {
                Url::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("CHECKOUT_ENDPOINT".to_string(), e.to_string())
                })
            })
            .transpose()?;

        if let Some(endpoint) = checkout_endpoint
            .as_ref()
            .filter(|url| !matches!(url.scheme(), "http" | "https"))
        {
            return Err(ConfigError::InvalidEnvVar(
                "CHECKOUT_ENDPOINT".to_string(),
                format!("unsupported scheme '{}'", endpoint.scheme()),
            ));
        }

        Ok(Self {
            data_dir,
            catalog_path,
            checkout_endpoint,
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
        })
    }

    /// Load the product catalog.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the catalog file cannot be read or is invalid.
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.catalog_path {
            Some(path) => {
                let json =
                    std::fs::read_to_string(path).map_err(|source| ConfigError::CatalogRead {
                        path: path.clone(),
                        source,
                    })?;
                Ok(Catalog::from_json(&json)?)
            }
            None => Ok(builtin_catalog()?),
        }
    }
}

/// Catalog used when no catalog file is configured.
///
/// # Errors
///
/// Returns an error only if the built-in product list is itself invalid.
pub fn builtin_catalog() -> Result<Catalog, CatalogError> {
    Catalog::new(vec![
        Product::new(1, "Pineapple Tee", Decimal::new(4999, 2)),
        Product::new(2, "Canvas Tote", Decimal::new(3450, 2)),
        Product::new(3, "Enamel Pin", Decimal::new(1200, 2)),
        Product::new(4, "Sticker Pack", Decimal::new(599, 2)),
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use pineapple_cart_core::ProductId;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<CartConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CartConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".cart"));
        assert!(config.catalog_path.is_none());
        assert!(config.checkout_endpoint.is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = config_from(&[("CART_DATA_DIR", "  "), ("SENTRY_DSN", "")]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".cart"));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_checkout_endpoint_parsed() {
        let config = config_from(&[
            ("CART_DATA_DIR", "/var/lib/cart"),
            ("CHECKOUT_ENDPOINT", "https://shop.example.test/create-checkout"),
        ])
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/cart"));
        assert_eq!(
            config.checkout_endpoint.unwrap().path(),
            "/create-checkout"
        );
    }

    #[test]
    fn test_invalid_checkout_endpoint() {
        let err = config_from(&[("CHECKOUT_ENDPOINT", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CHECKOUT_ENDPOINT"));

        let err = config_from(&[("CHECKOUT_ENDPOINT", "ftp://shop.example.test/")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = builtin_catalog().unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(
            catalog.get(ProductId::new(1)).unwrap().unit_price,
            Decimal::new(4999, 2)
        );
    }

    #[test]
    fn test_missing_catalog_file() {
        let config = config_from(&[("CART_CATALOG_PATH", "/nonexistent/catalog.json")]).unwrap();
        assert!(matches!(
            config.load_catalog(),
            Err(ConfigError::CatalogRead { .. })
        ));
    }
}
