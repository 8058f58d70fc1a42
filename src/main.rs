// =============================================================================
// EGX Analytics API: Main Entry Point
// =============================================================================

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use egx_analytics::api;
use egx_analytics::app_state::AppState;
use egx_analytics::market_data::{MarketDataSource, YahooClient};
use egx_analytics::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("EGX_CONFIG").unwrap_or_else(|_| "egx_config.json".to_string());
    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });
    config.apply_env_overrides();

    info!(
        bind_addr = %config.bind_addr,
        period = %config.default_period,
        interval = %config.default_interval,
        mode = ?config.compute_mode(),
        "EGX Analytics API starting"
    );

    // ── 2. Market data & shared state ────────────────────────────────────
    let source: Arc<dyn MarketDataSource> = Arc::new(
        YahooClient::new(config.yahoo_base_url.clone(), config.request_timeout())
            .context("failed to build market data client")?,
    );
    let state = Arc::new(AppState::new(&config, source));

    // ── 3. API server ────────────────────────────────────────────────────
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind API server on {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!("EGX Analytics API shut down complete.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received, stopping gracefully");
}
