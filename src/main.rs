//! domain-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use domain_gateway::api;
use domain_gateway::app_state::AppState;
use domain_gateway::config::{GatewayConfig, LogFormat};
use domain_gateway::domain::{DomainRegistry, Transport};
use domain_gateway::service::DomainService;
use domain_gateway::ws::ConnectionHub;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env().context("invalid LISTEN_ADDR")?;

    // Initialize tracing
    init_tracing(config.log_format);
    tracing::info!(addr = %config.listen_addr, "starting domain-gateway");

    // Build transport and domain layer
    let hub = Arc::new(ConnectionHub::new(config.connection_buffer));
    let registry = Arc::new(DomainRegistry::new(Arc::clone(&hub) as Arc<dyn Transport>));

    // Build service layer
    let domain_service = Arc::new(DomainService::new(registry));

    // Build application state
    let app_state = AppState {
        domain_service: Arc::clone(&domain_service),
        hub,
    };

    let app = api::build_app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    domain_service.shutdown().await;
    tracing::info!("domain-gateway stopped");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
