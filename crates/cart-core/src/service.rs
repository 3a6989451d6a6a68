//! # Checkout Service
//!
//! Turns a cart into a provider checkout session: every display price is
//! converted to minor units first, then the provider is called exactly once.

use crate::cart::{build_line_items, CheckoutRequest, CheckoutSessionResult, SessionParams};
use crate::error::CheckoutResult;
use crate::price::Currency;
use crate::provider::BoxedCheckoutProvider;
use tracing::{debug, info, instrument};

/// Stateless checkout adapter. Cheap to clone; share one per process.
#[derive(Clone)]
pub struct CheckoutService {
    provider: BoxedCheckoutProvider,
    currency: Currency,
}

impl CheckoutService {
    /// Create a service charging in EUR through `provider`
    pub fn new(provider: BoxedCheckoutProvider) -> Self {
        Self {
            provider,
            currency: Currency::EUR,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Build the provider request for a cart without sending it
    pub fn session_params(&self, request: &CheckoutRequest) -> CheckoutResult<SessionParams> {
        let line_items = build_line_items(&request.items, self.currency)?;
        Ok(SessionParams::card_payment(
            line_items,
            request.success_url.as_str(),
            request.cancel_url.as_str(),
        ))
    }

    /// Create a hosted checkout session for `request`.
    ///
    /// A malformed price fails before anything is sent. An empty cart is not
    /// rejected here; the provider decides.
    #[instrument(skip(self, request), fields(provider = self.provider_name(), items = request.items.len()))]
    pub async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> CheckoutResult<CheckoutSessionResult> {
        let params = self.session_params(request)?;

        debug!(
            "Creating checkout session: {} line items, total={}",
            params.line_items.len(),
            params
                .total()
                .map(|t| t.display(self.currency))
                .unwrap_or_else(|| "overflow".to_string())
        );

        let session = self.provider.create_session(&params).await?;

        match session.expires_at {
            Some(expires_at) => info!(
                "Created checkout session: id={}, expires_at={}",
                session.id,
                expires_at.to_rfc3339()
            ),
            None => info!("Created checkout session: id={}", session.id),
        }

        Ok(CheckoutSessionResult::from(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{CartItem, ProviderSession};
    use crate::error::CheckoutError;
    use crate::provider::CheckoutProvider;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Records every call and answers with a fixed outcome
    struct FakeProvider {
        calls: Mutex<Vec<SessionParams>>,
        outcome: CheckoutResult<ProviderSession>,
    }

    impl FakeProvider {
        fn answering(outcome: CheckoutResult<ProviderSession>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                outcome,
            })
        }

        fn calls(&self) -> Vec<SessionParams> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CheckoutProvider for FakeProvider {
        async fn create_session(&self, params: &SessionParams) -> CheckoutResult<ProviderSession> {
            self.calls.lock().unwrap().push(params.clone());
            self.outcome.clone()
        }

        fn provider_name(&self) -> &'static str {
            "fake"
        }
    }

    fn mug_request() -> CheckoutRequest {
        CheckoutRequest {
            items: vec![CartItem {
                name: "Mug".into(),
                price: "€45,00".into(),
                quantity: 2,
                image_url: "https://x/y.png".into(),
            }],
            success_url: "https://a/ok".into(),
            cancel_url: "https://a/cancel".into(),
        }
    }

    #[tokio::test]
    async fn test_mug_checkout_reaches_provider_and_returns_session() {
        let provider = FakeProvider::answering(Ok(ProviderSession::new(
            "cs_test_mug",
            "https://checkout.stripe.com/c/pay/cs_test_mug",
        )));
        let service = CheckoutService::new(provider.clone());

        let result = service.create_checkout_session(&mug_request()).await.unwrap();

        assert_eq!(result.session_id, "cs_test_mug");
        assert_eq!(result.url, "https://checkout.stripe.com/c/pay/cs_test_mug");

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        let params = &calls[0];
        assert_eq!(params.mode.as_str(), "payment");
        assert_eq!(params.payment_method_types.len(), 1);
        assert_eq!(params.payment_method_types[0].as_str(), "card");
        assert_eq!(params.success_url, "https://a/ok");
        assert_eq!(params.cancel_url, "https://a/cancel");
        assert_eq!(params.line_items.len(), 1);
        assert_eq!(params.line_items[0].unit_amount.as_i64(), 4500);
        assert_eq!(params.line_items[0].currency.as_str(), "eur");
        assert_eq!(params.line_items[0].quantity, 2);
        assert_eq!(params.line_items[0].images, vec!["https://x/y.png".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_cart_is_forwarded() {
        let provider = FakeProvider::answering(Ok(ProviderSession::new("cs_empty", "https://c/e")));
        let service = CheckoutService::new(provider.clone());
        let request = CheckoutRequest {
            items: Vec::new(),
            ..mug_request()
        };

        service.create_checkout_session(&request).await.unwrap();

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].line_items.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_price_never_calls_provider() {
        let provider = FakeProvider::answering(Ok(ProviderSession::new("cs_x", "https://c/x")));
        let service = CheckoutService::new(provider.clone());

        for price in ["abc", "€", "€1,2,3"] {
            let mut request = mug_request();
            request.items.push(CartItem {
                name: "Broken".into(),
                price: price.into(),
                quantity: 1,
                image_url: "https://x/b.png".into(),
            });

            let err = service.create_checkout_session(&request).await.unwrap_err();
            assert_eq!(err.kind(), "malformed_price");
        }

        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_provider_rejection_is_returned_unchanged() {
        let rejection = CheckoutError::UpstreamRejected {
            provider: "fake".into(),
            status: 401,
            message: "Invalid API Key provided: sk_test_****".into(),
        };
        let provider = FakeProvider::answering(Err(rejection.clone()));
        let service = CheckoutService::new(provider.clone());

        let err = service.create_checkout_session(&mug_request()).await.unwrap_err();

        assert_eq!(err, rejection);
        assert_eq!(provider.calls().len(), 1);
    }
}
