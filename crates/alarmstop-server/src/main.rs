//! alarmstop - stop the ringing smart-mattress alarm with one HTTP request.
//!
//! Serves `GET /stop` (and `GET /health`) on `PORT`, default 3000.
//! Account and OAuth client credentials come from the environment or `.env`.

mod config;
mod routes;

use std::io;
use std::sync::Arc;

use alarmstop_core::{AlarmController, ApiClient, SessionManager};
use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Config;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = Config::from_env().context("Invalid configuration")?;
    info!(
        email = %config.credentials.email(),
        bearer_policy = ?config.bearer_policy,
        "alarmstop starting"
    );

    let api = ApiClient::new(config.request_timeout)
        .context("Failed to create API client")?
        .with_base_urls(&config.client_api_url, &config.app_api_url);
    let sessions =
        SessionManager::new(api, config.credentials.clone()).with_policy(config.bearer_policy);
    let controller = Arc::new(AlarmController::new(sessions));

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    info!("Listening at http://localhost:{}", config.port);

    axum::serve(listener, routes::router(controller))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("alarmstop shutting down");
    Ok(())
}
