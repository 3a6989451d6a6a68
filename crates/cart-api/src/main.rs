//! # eurocart
//!
//! Cart to Stripe Checkout adapter.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//!
//! # Run the server (LOG_FORMAT=json for structured logs)
//! eurocart
//! ```

use cart_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_logging();

    // Print banner
    print_banner();

    // Initialize application state; a missing Stripe key stops here
    let state = AppState::new()?;

    let addr = state.config.bind_addr();
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.service.provider_name());

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("eurocart starting on http://{}", addr);

    if !is_prod {
        info!("Health: GET http://{}/health", addr);
        info!("Checkout: POST http://{}/stripe/create-checkout-session", addr);
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("eurocart stopped");

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn print_banner() {
    println!(
        r#"
  eurocart
  ━━━━━━━━━━━━━━━━━━━━━━━
  Cart to Stripe Checkout
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
