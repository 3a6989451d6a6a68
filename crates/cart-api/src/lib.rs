//! # cart-api
//!
//! HTTP API layer for eurocart.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The checkout session endpoint
//! - Application configuration and shared state
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/stripe/create-checkout-session` | Create checkout session |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
