//! # Request Handlers
//!
//! Axum request handlers for the checkout API.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use cart_core::{CheckoutError, CheckoutRequest, CheckoutSessionResult};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Underlying error message
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(err.to_string())),
    )
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "eurocart",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a hosted checkout session for the posted cart
#[instrument(skip(state, request), fields(items = request.items.len()))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutSessionResult>, (StatusCode, Json<ErrorResponse>)> {
    state
        .service
        .create_checkout_session(&request)
        .await
        .map(Json)
        .map_err(|e| {
            error!(
                kind = e.kind(),
                input_error = e.is_input_error(),
                "Error creating Stripe session: {}",
                e
            );
            checkout_error_to_response(e)
        })
}
