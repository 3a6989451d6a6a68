//! # cart-core
//!
//! Core types and traits for the eurocart checkout adapter.
//!
//! This crate provides:
//! - `CartItem` and `CheckoutRequest` for the inbound cart
//! - `parse_display_price` for turning `"€45,00"` into integer minor units
//! - `LineItem` and `SessionParams` for the provider request
//! - `CheckoutProvider` trait for implementing payment providers
//! - `CheckoutService`, the adapter itself
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use cart_core::{CheckoutRequest, CheckoutService};
//!
//! let service = CheckoutService::new(provider);
//! let session = service.create_checkout_session(&request).await?;
//!
//! // Redirect user to session.url
//! ```

pub mod cart;
pub mod error;
pub mod price;
pub mod provider;
pub mod service;

// Re-exports for convenience
pub use cart::{
    build_line_items, CartItem, CheckoutRequest, CheckoutSessionResult, LineItem, PaymentMethod,
    ProviderSession, SessionMode, SessionParams,
};
pub use error::{CheckoutError, CheckoutResult};
pub use price::{parse_display_price, Currency, MinorUnits};
pub use provider::{BoxedCheckoutProvider, CheckoutProvider};
pub use service::CheckoutService;
