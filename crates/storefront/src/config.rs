//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `ORDER_API_BASE_URL` - Order API root (default: <https://cleangirl-prod.up.railway.app>)
//! - `ORDER_API_PRODUCT_NAME` - Inventory entry to price the page from (default: Clean Girl)
//! - `ORDER_API_DEFAULT_PRICE_CENTS` - Unit price used until inventory loads (default: 1990)
//! - `ORDER_API_PRICING_TIMEOUT_MS` - How long the landing page waits for inventory (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default order API root.
pub const DEFAULT_ORDER_API_BASE_URL: &str = "https://cleangirl-prod.up.railway.app";

/// Default inventory product name.
pub const DEFAULT_PRODUCT_NAME: &str = "Clean Girl";

/// Default unit price in cents ($19.90).
pub const DEFAULT_PRICE_CENTS: i64 = 1990;

/// Default wait for inventory before rendering at the default price.
pub const DEFAULT_PRICING_TIMEOUT_MS: u64 = 3000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Remote order API configuration
    pub order_api: OrderApiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g., production, staging)
    pub sentry_environment: Option<String>,
}

/// Remote order API configuration.
#[derive(Debug, Clone)]
pub struct OrderApiConfig {
    /// API root; endpoint paths are joined onto it
    pub base_url: Url,
    /// Inventory entry whose pricing the page displays
    pub product_name: String,
    /// Unit price in cents shown until (or unless) inventory loads
    pub default_price_cents: i64,
    /// Inventory lookups slower than this render at the default price
    pub pricing_timeout: Duration,
}

impl Default for OrderApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_order_api_url(),
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            default_price_cents: DEFAULT_PRICE_CENTS,
            pricing_timeout: Duration::from_millis(DEFAULT_PRICING_TIMEOUT_MS),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");

        Ok(Self {
            host,
            port,
            base_url,
            order_api: OrderApiConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl OrderApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url(
            "ORDER_API_BASE_URL",
            &get_env_or_default("ORDER_API_BASE_URL", DEFAULT_ORDER_API_BASE_URL),
        )?;
        let default_price_cents = parse_env(
            "ORDER_API_DEFAULT_PRICE_CENTS",
            &DEFAULT_PRICE_CENTS.to_string(),
        )?;
        let pricing_timeout_ms: u64 = parse_env(
            "ORDER_API_PRICING_TIMEOUT_MS",
            &DEFAULT_PRICING_TIMEOUT_MS.to_string(),
        )?;

        Ok(Self {
            base_url,
            product_name: get_env_or_default("ORDER_API_PRODUCT_NAME", DEFAULT_PRODUCT_NAME),
            default_price_cents,
            pricing_timeout: Duration::from_millis(pricing_timeout_ms),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) with `FromStr`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse an API root URL.
///
/// A trailing slash is ensured so that `Url::join("inventory")` appends
/// rather than replacing the last path segment.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// The compiled-in order API root.
fn default_order_api_url() -> Url {
    #[allow(clippy::expect_used)] // constant is a valid URL
    Url::parse(DEFAULT_ORDER_API_BASE_URL).expect("default order API URL is valid")
}
