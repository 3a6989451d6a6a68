//! # Checkout Error Types
//!
//! Typed error handling for the eurocart checkout adapter.
//! Every checkout operation returns `Result<T, CheckoutError>`.

use thiserror::Error;

/// Core error type for all checkout operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// A cart price could not be read as a monetary amount
    #[error("Malformed price {price:?}: {reason}")]
    MalformedPrice { price: String, reason: String },

    /// The provider answered but refused the request (bad URL, bad amount, auth failure)
    #[error("Provider error [{provider}] (HTTP {status}): {message}")]
    UpstreamRejected {
        provider: String,
        status: u16,
        message: String,
    },

    /// Network/timeout error communicating with the provider
    #[error("Network error [{provider}]: {message}")]
    Transport { provider: String, message: String },

    /// Configuration errors (missing keys, invalid config). Raised at start-up.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CheckoutError {
    pub fn malformed_price(price: impl Into<String>, reason: impl Into<String>) -> Self {
        CheckoutError::MalformedPrice {
            price: price.into(),
            reason: reason.into(),
        }
    }

    /// Stable tag for logs and assertions
    pub fn kind(&self) -> &'static str {
        match self {
            CheckoutError::MalformedPrice { .. } => "malformed_price",
            CheckoutError::UpstreamRejected { .. } => "upstream_rejected",
            CheckoutError::Transport { .. } => "transport",
            CheckoutError::Configuration(_) => "configuration",
        }
    }

    /// Returns true when the error came from the caller's input rather than
    /// from the provider or infrastructure
    pub fn is_input_error(&self) -> bool {
        matches!(self, CheckoutError::MalformedPrice { .. })
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            CheckoutError::malformed_price("abc", "missing currency symbol").kind(),
            "malformed_price"
        );
        assert_eq!(
            CheckoutError::Transport {
                provider: "stripe".into(),
                message: "connection refused".into()
            }
            .kind(),
            "transport"
        );
        assert!(CheckoutError::malformed_price("€", "no digits").is_input_error());
        assert!(!CheckoutError::Configuration("x".into()).is_input_error());
    }

    #[test]
    fn test_upstream_message_is_kept_in_display() {
        let err = CheckoutError::UpstreamRejected {
            provider: "stripe".into(),
            status: 401,
            message: "Invalid API Key provided: sk_test_****".into(),
        };
        assert!(err.to_string().contains("Invalid API Key provided: sk_test_****"));
    }
}
