//! # cart-stripe
//!
//! Stripe Checkout Sessions provider for eurocart.
//!
//! `StripeCheckoutClient` implements `cart_core::CheckoutProvider`:
//! - Dynamic `price_data` line items (no pre-created Stripe prices)
//! - Card payments, one-time `payment` mode
//! - Bounded request timeout, single retry when no connection could be made
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cart_core::CheckoutService;
//! use cart_stripe::StripeCheckoutClient;
//!
//! // Create client from environment
//! let stripe = StripeCheckoutClient::from_env()?;
//! let service = CheckoutService::new(Arc::new(stripe));
//!
//! let session = service.create_checkout_session(&request).await?;
//! // Redirect user to session.url
//! ```

pub mod checkout;
pub mod config;

// Re-exports
pub use checkout::StripeCheckoutClient;
pub use config::StripeConfig;
