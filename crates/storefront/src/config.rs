//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults target local development.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL, decides secure cookies (default: http://localhost:3000)
//! - `BACKEND_API_URL` - Restaurant backend REST API (default: http://localhost:8000)
//! - `BACKEND_CACHE_TTL_SECS` - Restaurant/menu cache TTL (default: 300)
//! - `CHECKOUT_DELIVERY_FEE` - Flat delivery fee (default: 3.99)
//! - `CHECKOUT_TAX_RATE` - Tax rate on the subtotal (default: 0.08)
//! - `CHECKOUT_SERVICE_FEE` - Flat service fee (default: 0.00)
//! - `PLATFORM_SERVICE_FEE_PER_ORDER` - Revenue dashboard service fee (default: 2.99)
//! - `PLATFORM_DELIVERY_COMMISSION_PER_ORDER` - Revenue dashboard delivery commission (default: 0.60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use tastebud_core::revenue::PlatformFees;
use tastebud_core::PricingPolicy;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
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
    /// Restaurant backend configuration
    pub backend: BackendConfig,
    /// Display pricing for cart and checkout
    pub pricing: PricingPolicy,
    /// Per-order fees for the revenue dashboard
    pub platform_fees: PlatformFees,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "production")
    pub sentry_environment: Option<String>,
}

/// Restaurant backend REST API configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL, without a trailing slash
    pub base_url: Url,
    /// Time-to-live for cached restaurants and menus
    pub cache_ttl: Duration,
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
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env.parsed_or("STOREFRONT_HOST", "127.0.0.1")?;
        let port = env.parsed_or("STOREFRONT_PORT", "3000")?;
        let base_url = env.or_default("STOREFRONT_BASE_URL", "http://localhost:3000");

        let backend = BackendConfig {
            base_url: parse_backend_url(&env.or_default("BACKEND_API_URL", "http://localhost:8000"))?,
            cache_ttl: Duration::from_secs(env.parsed_or("BACKEND_CACHE_TTL_SECS", "300")?),
        };

        let pricing = PricingPolicy {
            delivery_fee: env.non_negative_decimal("CHECKOUT_DELIVERY_FEE", "3.99")?,
            tax_rate: env.non_negative_decimal("CHECKOUT_TAX_RATE", "0.08")?,
            service_fee: env.non_negative_decimal("CHECKOUT_SERVICE_FEE", "0.00")?,
        };

        let platform_fees = PlatformFees {
            service_fee_per_order: env
                .non_negative_decimal("PLATFORM_SERVICE_FEE_PER_ORDER", "2.99")?,
            delivery_commission_per_order: env
                .non_negative_decimal("PLATFORM_DELIVERY_COMMISSION_PER_ORDER", "0.60")?,
        };

        Ok(Self {
            host,
            port,
            base_url,
            backend,
            pricing,
            platform_fees,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Environment lookup with typed accessors.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional, non-blank variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to a default string.
    fn parsed_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Parse a money amount or rate that must not be negative.
    fn non_negative_decimal(&self, key: &str, default: &str) -> Result<Decimal, ConfigError> {
        let value: Decimal = self.parsed_or(key, default)?;
        if value.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "must not be negative".to_string(),
            ));
        }
        Ok(value)
    }
}

/// Parse the backend base URL, normalising away a trailing slash.
fn parse_backend_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim_end_matches('/'))
        .map_err(|e| ConfigError::InvalidEnvVar("BACKEND_API_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "BACKEND_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.backend.base_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.backend.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.pricing, PricingPolicy::default());
        assert_eq!(config.platform_fees, PlatformFees::default());
        assert!(config.sentry_dsn.is_none());
        assert!(!config.is_secure());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_PORT", "8080"),
            ("STOREFRONT_BASE_URL", "https://eat.example.com"),
            ("BACKEND_API_URL", "https://api.example.com/"),
            ("CHECKOUT_TAX_RATE", "0.1"),
            ("SENTRY_DSN", "   "),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.is_secure());
        assert_eq!(config.backend.base_url.host_str(), Some("api.example.com"));
        assert_eq!(config.pricing.tax_rate, Decimal::new(1, 1));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("STOREFRONT_PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_negative_fee_rejected() {
        let err = load(&[("CHECKOUT_DELIVERY_FEE", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "CHECKOUT_DELIVERY_FEE"));
    }

    #[test]
    fn test_backend_url_scheme() {
        assert!(parse_backend_url("ftp://files.example.com").is_err());
        assert!(parse_backend_url("not a url").is_err());
    }
}
