//! # Checkout Provider Trait
//!
//! The seam between the adapter and the payment provider that hosts the
//! checkout page.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  CheckoutProvider (trait)                   │
//! │  ├── create_session()                                       │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                 ┌──────────┴──────────┐
//!                 │                     │
//!         ┌───────┴───────┐     ┌───────┴───────┐
//!         │StripeCheckout │     │  in-memory    │
//!         │    Client     │     │  test fakes   │
//!         └───────────────┘     └───────────────┘
//! ```

use crate::cart::{ProviderSession, SessionParams};
use crate::error::CheckoutResult;
use async_trait::async_trait;
use std::sync::Arc;

/// A payment provider able to open hosted checkout sessions.
///
/// Implementations are called once per checkout request and must not retry
/// after the provider has answered.
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Create a checkout session.
    ///
    /// # Returns
    /// The provider's session id and hosted page URL, verbatim.
    async fn create_session(&self, params: &SessionParams) -> CheckoutResult<ProviderSession>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared provider (dynamic dispatch)
pub type BoxedCheckoutProvider = Arc<dyn CheckoutProvider>;
