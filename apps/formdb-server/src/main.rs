use std::sync::Arc;

use formdb_gateway::{Gateway, GatewayServer};
use formdb_server::auth::BearerTokenValidator;
use formdb_server::bridge::MemoryBridge;
use formdb_server::config::ServerConfig;
use formdb_server::metrics::PrometheusMetrics;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Parse CLI args for config file path
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "formdb.yaml".to_string());

    tracing::info!("Loading configuration from: {}", config_path);

    // Load configuration (try file first, fall back to env)
    let config = if std::path::Path::new(&config_path).exists() {
        ServerConfig::load_from_file(&config_path)?
    } else {
        tracing::warn!("Config file not found, loading from environment variables");
        ServerConfig::load_from_env()?
    };

    tracing::info!("Listen address: {}", config.listen_addr);
    tracing::info!("gRPC service: {}", config.api.grpc_service);

    let addr = config.listen_addr.parse()?;

    let mut gateway = Gateway::new(config.gateway_config(), Arc::new(MemoryBridge::new()))
        .with_metrics(Arc::new(PrometheusMetrics::new()));

    if let Some(token) = config.auth.token.as_deref().filter(|t| !t.is_empty()) {
        gateway = gateway.with_auth(Arc::new(BearerTokenValidator::new(token)));
    }

    let mut server = GatewayServer::new(addr, gateway);
    server.start().await?;

    tracing::info!("FormDB gateway is ready");

    // Wait for shutdown signal (SIGINT/SIGTERM)
    tokio::signal::ctrl_c().await?;

    tracing::info!("Received shutdown signal, gracefully shutting down...");

    server.shutdown().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
