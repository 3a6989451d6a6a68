//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the checkout service (with its provider already configured) and the
//! server configuration.

use cart_core::{BoxedCheckoutProvider, CheckoutService};
use cart_stripe::StripeCheckoutClient;
use std::sync::Arc;
use tracing::{info, warn};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Allowed CORS origins; empty means any origin
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Address to bind to, as `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Checkout adapter
    pub service: CheckoutService,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by Stripe.
    ///
    /// Fails when the Stripe secret key is missing or malformed, so the
    /// process never starts serving without a credential.
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let stripe = StripeCheckoutClient::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        let test_mode = stripe.config().is_test_mode();
        info!("Stripe mode: {}", if test_mode { "test" } else { "live" });
        if test_mode && config.is_production() {
            warn!("Production environment is using a Stripe test key");
        }

        Ok(Self::with_provider(config, Arc::new(stripe)))
    }

    /// Create an AppState around any provider (fakes in tests)
    pub fn with_provider(config: AppConfig, provider: BoxedCheckoutProvider) -> Self {
        Self {
            service: CheckoutService::new(provider),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, "development");
        assert!(config.cors_allowed_origins.is_empty());
        assert!(!config.is_production());
    }

    #[test]
    fn test_app_config_overrides() {
        let config = AppConfig::from_lookup(|key| match key {
            "HOST" => Some("0.0.0.0".to_string()),
            "PORT" => Some("3000".to_string()),
            "ENVIRONMENT" => Some("production".to_string()),
            "CORS_ALLOWED_ORIGINS" => {
                Some("https://shop.example, https://admin.example,".to_string())
            }
            _ => None,
        });

        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert!(config.is_production());
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://shop.example", "https://admin.example"]
        );
    }

    #[test]
    fn test_invalid_port_falls_back_to_default() {
        let config = AppConfig::from_lookup(|key| (key == "PORT").then(|| "http".to_string()));
        assert_eq!(config.port, 8080);
    }
}
