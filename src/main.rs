// Main entry point - Dependency injection and server setup
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use marina_dashboard::application::history_service::HistoryService;
use marina_dashboard::application::module_catalog::ModuleCatalog;
use marina_dashboard::application::realtime_service::RealtimeService;
use marina_dashboard::application::remote_control::RemoteControl;
use marina_dashboard::infrastructure::config::{load_modules_config, load_server_config, normalize_base_path};
use marina_dashboard::infrastructure::random_source::{random_docks, RandomHistorySource, RandomTelemetrySource};
use marina_dashboard::presentation::app_state::AppState;
use marina_dashboard::presentation::router::build_router;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let server_config = load_server_config()?;
    let modules_config = load_modules_config()?;
    let telemetry = server_config.telemetry.clone();

    // Create services (application layer)
    let catalog = ModuleCatalog::from_config(&modules_config)?;
    tracing::info!(modules = catalog.len(), "module catalog ready");

    let realtime = RealtimeService::new(Duration::from_millis(telemetry.interval_ms));
    realtime.activate(RandomTelemetrySource::new(telemetry.docks)).await;

    let history_service = HistoryService::new(Arc::new(RandomHistorySource::new()), telemetry.docks);
    let remote_control = RemoteControl::new(random_docks(telemetry.docks, telemetry.devices_per_dock));

    let state = Arc::new(AppState::new(catalog, realtime, history_service, remote_control));

    // Build router (presentation layer)
    let base_path = normalize_base_path(&server_config.server.base_path);
    let router = build_router(state.clone(), &base_path);

    // Start server
    let addr: SocketAddr = format!("{}:{}", server_config.server.host, server_config.server.port).parse()?;
    tracing::info!(%addr, %base_path, "starting marina-dashboard service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.realtime.shutdown().await;
    tracing::info!("shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {}", e);
    }
}
