//! Server startup and lifecycle

use crate::{reload, routes, AppState, GatewayConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Run the gateway server until Ctrl-C
pub async fn run_server(config: GatewayConfig, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    // Create application state
    let state = Arc::new(AppState::new(config.clone()).await?);

    // Reload hostname settings on SIGHUP
    let router = Arc::clone(&state.hostname);
    tokio::spawn(async move {
        if let Err(e) = reload::watch_sighup(config_path, router).await {
            error!("Config reload disabled: {}", e);
        }
    });

    // Bind to address
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!("🚀 Fula Gateway listening on http://{}", addr);
    info!("Forwarding content requests to {}", config.upstream_url);

    serve(listener, state, shutdown_signal()).await
}

/// Serve requests on `listener` until `shutdown` completes
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = routes::create_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("👋 Gateway shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
