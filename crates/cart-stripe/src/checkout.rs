//! # Stripe Checkout Sessions
//!
//! Implementation of the Stripe Checkout Sessions API.
//! One `POST /v1/checkout/sessions` per checkout request.

use crate::config::StripeConfig;
use async_trait::async_trait;
use cart_core::{CheckoutError, CheckoutProvider, CheckoutResult, ProviderSession, SessionParams};
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

const PROVIDER: &str = "stripe";
const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Stripe Checkout Session client
///
/// Opens Stripe-hosted checkout pages for card payments.
pub struct StripeCheckoutClient {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutClient {
    /// Create a new Stripe checkout client
    pub fn new(config: StripeConfig) -> CheckoutResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                CheckoutError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Build form data for the Stripe API
    fn form_params(params: &SessionParams) -> Vec<(String, String)> {
        let mut form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), params.mode.as_str().to_string()),
            ("success_url".to_string(), params.success_url.clone()),
            ("cancel_url".to_string(), params.cancel_url.clone()),
        ];

        for (i, method) in params.payment_method_types.iter().enumerate() {
            form_params.push((
                format!("payment_method_types[{}]", i),
                method.as_str().to_string(),
            ));
        }

        for (i, item) in params.line_items.iter().enumerate() {
            form_params.push((
                format!("line_items[{}][price_data][currency]", i),
                item.currency.as_str().to_string(),
            ));
            form_params.push((
                format!("line_items[{}][price_data][unit_amount]", i),
                item.unit_amount.to_string(),
            ));
            form_params.push((
                format!("line_items[{}][price_data][product_data][name]", i),
                item.name.clone(),
            ));
            for (j, img) in item.images.iter().enumerate() {
                form_params.push((
                    format!("line_items[{}][price_data][product_data][images][{}]", i, j),
                    img.clone(),
                ));
            }
            form_params.push((
                format!("line_items[{}][quantity]", i),
                item.quantity.to_string(),
            ));
        }

        form_params
    }

    fn transport_error(err: reqwest::Error) -> CheckoutError {
        let message = if err.is_timeout() {
            format!("request to Stripe timed out: {}", err)
        } else {
            err.to_string()
        };
        CheckoutError::Transport {
            provider: PROVIDER.to_string(),
            message,
        }
    }

    fn rejected(status: u16, message: impl Into<String>) -> CheckoutError {
        CheckoutError::UpstreamRejected {
            provider: PROVIDER.to_string(),
            status,
            message: message.into(),
        }
    }

    /// Send the form, retrying only when no connection could be made.
    ///
    /// Once Stripe may have seen the request (timeout, any HTTP answer) the
    /// outcome is returned as is.
    async fn send(&self, url: &str, form: &[(String, String)]) -> CheckoutResult<reqwest::Response> {
        let mut attempt: u32 = 0;
        loop {
            let result = self
                .client
                .post(url)
                .header("Authorization", self.config.auth_header())
                .header("Stripe-Version", &self.config.api_version)
                .form(form)
                .send()
                .await;

            match result {
                Ok(response) => return Ok(response),
                Err(e)
                    if e.is_connect()
                        && !e.is_timeout()
                        && attempt < self.config.max_transport_retries =>
                {
                    attempt += 1;
                    warn!(attempt, error = %e, "Could not connect to Stripe, retrying");
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
                Err(e) => return Err(Self::transport_error(e)),
            }
        }
    }
}

#[async_trait]
impl CheckoutProvider for StripeCheckoutClient {
    #[instrument(skip(self, params), fields(line_items = params.line_items.len()))]
    async fn create_session(&self, params: &SessionParams) -> CheckoutResult<ProviderSession> {
        let form_params = Self::form_params(params);
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        debug!(
            "Creating Stripe checkout session: {} items, mode={}",
            params.line_items.len(),
            params.mode.as_str()
        );

        let response = self.send(&url, &form_params).await?;

        let status = response.status();
        let body = response.text().await.map_err(Self::transport_error)?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            // Parse Stripe error
            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(Self::rejected(status.as_u16(), error_response.error.message));
            }

            return Err(Self::rejected(
                status.as_u16(),
                format!("HTTP {}: {}", status, body),
            ));
        }

        let session_response: StripeCheckoutSessionResponse = serde_json::from_str(&body)
            .map_err(|e| {
                Self::rejected(
                    status.as_u16(),
                    format!("Failed to parse Stripe response: {}", e),
                )
            })?;

        let checkout_url = session_response.url.ok_or_else(|| {
            Self::rejected(
                status.as_u16(),
                format!("Stripe session {} has no hosted checkout URL", session_response.id),
            )
        })?;

        let expires_at = session_response
            .expires_at
            .and_then(|ts| DateTime::from_timestamp(ts, 0));

        info!(
            expires_at = ?expires_at,
            "Created Stripe checkout session: id={}, url={}",
            session_response.id, checkout_url
        );

        Ok(ProviderSession {
            id: session_response.id,
            url: checkout_url,
            expires_at,
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
