//! # Cart and Session Types
//!
//! Inbound cart types, the provider-facing line items derived from them, and
//! the checkout session handed back to the caller.

use crate::error::CheckoutResult;
use crate::price::{parse_display_price, Currency, MinorUnits};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One product in the caller's cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product display name
    pub name: String,

    /// Display-formatted price, e.g. "€45,00"
    pub price: String,

    pub quantity: u32,

    /// Product image shown on the hosted checkout page
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// Body of `POST /stripe/create-checkout-session`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Items to purchase, in display order. An empty list is forwarded as-is.
    pub items: Vec<CartItem>,

    /// URL to redirect after successful payment
    pub success_url: String,

    /// URL to redirect if the customer cancels
    pub cancel_url: String,
}

/// A priced line item as the provider receives it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub currency: Currency,

    /// Product name
    pub name: String,

    /// Product images
    pub images: Vec<String>,

    /// Unit price in minor units
    pub unit_amount: MinorUnits,

    pub quantity: u32,
}

impl LineItem {
    /// Convert a cart item, parsing its display price into minor units
    pub fn from_cart_item(item: &CartItem, currency: Currency) -> CheckoutResult<Self> {
        let unit_amount = parse_display_price(&item.price, currency)?;
        Ok(Self {
            currency,
            name: item.name.clone(),
            images: vec![item.image_url.clone()],
            unit_amount,
            quantity: item.quantity,
        })
    }

    /// Total for this line item, `None` on overflow
    pub fn total(&self) -> Option<MinorUnits> {
        self.unit_amount.checked_mul(self.quantity)
    }
}

/// Convert every cart item, keeping order. Fails on the first malformed price.
pub fn build_line_items(items: &[CartItem], currency: Currency) -> CheckoutResult<Vec<LineItem>> {
    items
        .iter()
        .map(|item| LineItem::from_cart_item(item, currency))
        .collect()
}

/// Payment methods accepted on the hosted page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
        }
    }
}

/// Checkout mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// One-time payment
    #[default]
    Payment,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Payment => "payment",
        }
    }
}

/// Everything the provider needs to open a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionParams {
    pub payment_method_types: Vec<PaymentMethod>,
    pub line_items: Vec<LineItem>,
    pub mode: SessionMode,
    pub success_url: String,
    pub cancel_url: String,
}

impl SessionParams {
    /// Card-only, one-time payment session
    pub fn card_payment(
        line_items: Vec<LineItem>,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            payment_method_types: vec![PaymentMethod::Card],
            line_items,
            mode: SessionMode::Payment,
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
        }
    }

    /// Sum of all line items, `None` on overflow
    pub fn total(&self) -> Option<MinorUnits> {
        self.line_items
            .iter()
            .try_fold(MinorUnits::ZERO, |acc, item| acc.checked_add(item.total()?))
    }
}

/// A session as created by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSession {
    /// Provider's session ID
    pub id: String,

    /// Hosted checkout page
    pub url: String,

    /// When the hosted page stops accepting payment, if the provider says
    pub expires_at: Option<DateTime<Utc>>,
}

impl ProviderSession {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            expires_at: None,
        }
    }
}

/// Response body returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSessionResult {
    #[serde(rename = "sessionId")]
    pub session_id: String,

    /// Redirect the customer here
    pub url: String,
}

impl From<ProviderSession> for CheckoutSessionResult {
    fn from(session: ProviderSession) -> Self {
        Self {
            session_id: session.id,
            url: session.url,
        }
    }
}
