//! # Stripe Configuration
//!
//! Configuration management for the Stripe integration.
//! The secret key is read once at start-up and handed to the client
//! explicitly; nothing reads it from ambient state afterwards.

use cart_core::{CheckoutError, CheckoutResult};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
pub const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_TRANSPORT_RETRIES: u32 = 1;

const SECRET_KEY_PREFIXES: [&str; 4] = ["sk_test_", "sk_live_", "rk_test_", "rk_live_"];

/// Stripe API configuration
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_... or sk_live_..., restricted rk_ keys allowed)
    pub secret_key: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,

    /// Upper bound for one request to Stripe
    pub timeout: Duration,

    /// Extra attempts allowed when the connection could not be established
    pub max_transport_retries: u32,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `STRIPE_SECRET_KEY`
    ///
    /// Optional:
    /// - `STRIPE_API_BASE_URL`, `STRIPE_API_VERSION`
    /// - `STRIPE_TIMEOUT_SECS`, `STRIPE_MAX_TRANSPORT_RETRIES`
    pub fn from_env() -> CheckoutResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> CheckoutResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup("STRIPE_SECRET_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| CheckoutError::Configuration("STRIPE_SECRET_KEY not set".to_string()))?;

        if !SECRET_KEY_PREFIXES.iter().any(|p| secret_key.starts_with(p)) {
            return Err(CheckoutError::Configuration(
                "STRIPE_SECRET_KEY must start with sk_test_, sk_live_, rk_test_ or rk_live_"
                    .to_string(),
            ));
        }

        let timeout_secs = match lookup("STRIPE_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(CheckoutError::Configuration(format!(
                        "STRIPE_TIMEOUT_SECS must be a positive integer, got {:?}",
                        raw
                    )))
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        let max_transport_retries = match lookup("STRIPE_MAX_TRANSPORT_RETRIES") {
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                CheckoutError::Configuration(format!(
                    "STRIPE_MAX_TRANSPORT_RETRIES must be a non-negative integer, got {:?}",
                    raw
                ))
            })?,
            None => DEFAULT_MAX_TRANSPORT_RETRIES,
        };

        Ok(Self {
            secret_key,
            api_base_url: lookup("STRIPE_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            api_version: lookup("STRIPE_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            max_transport_retries,
        })
    }

    /// Create config with an explicit key and defaults for the rest (for testing)
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_transport_retries: DEFAULT_MAX_TRANSPORT_RETRIES,
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_") || self.secret_key.starts_with("rk_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_transport_retries(mut self, retries: u32) -> Self {
        self.max_transport_retries = retries;
        self
    }
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let visible: String = self.secret_key.chars().take(8).collect();
        f.debug_struct("StripeConfig")
            .field("secret_key", &format!("{}****", visible))
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .field("max_transport_retries", &self.max_transport_retries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StripeConfig::from_lookup(lookup(&[("STRIPE_SECRET_KEY", "sk_test_abc123")]))
            .unwrap();

        assert!(config.is_test_mode());
        assert_eq!(config.api_base_url, "https://api.stripe.com");
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_transport_retries, 1);
    }

    #[test]
    fn test_missing_key_fails() {
        let err = StripeConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err.kind(), "configuration");

        let err = StripeConfig::from_lookup(lookup(&[("STRIPE_SECRET_KEY", "  ")])).unwrap_err();
        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn test_key_prefix_is_validated() {
        let err = StripeConfig::from_lookup(lookup(&[("STRIPE_SECRET_KEY", "pk_test_abc")]))
            .unwrap_err();
        assert!(err.to_string().contains("STRIPE_SECRET_KEY"));

        let config = StripeConfig::from_lookup(lookup(&[("STRIPE_SECRET_KEY", "rk_live_abc")]))
            .unwrap();
        assert!(!config.is_test_mode());
    }

    #[test]
    fn test_overrides() {
        let config = StripeConfig::from_lookup(lookup(&[
            ("STRIPE_SECRET_KEY", "sk_live_abc"),
            ("STRIPE_API_BASE_URL", "http://localhost:12111"),
            ("STRIPE_TIMEOUT_SECS", "5"),
            ("STRIPE_MAX_TRANSPORT_RETRIES", "0"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "http://localhost:12111");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_transport_retries, 0);
    }

    #[test]
    fn test_bad_timeout_fails() {
        for raw in ["0", "soon", "-1"] {
            let result = StripeConfig::from_lookup(lookup(&[
                ("STRIPE_SECRET_KEY", "sk_test_abc"),
                ("STRIPE_TIMEOUT_SECS", raw),
            ]));
            assert!(result.is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_auth_header() {
        let config = StripeConfig::new("sk_test_abc123");
        assert_eq!(config.auth_header(), "Bearer sk_test_abc123");
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = StripeConfig::new("sk_test_supersecretvalue");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("supersecretvalue"));
        assert!(debug.contains("sk_test_****"));
    }
}
