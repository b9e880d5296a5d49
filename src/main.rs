//! Capture server - main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use webhook_capture::{
    api::{build_router, AppState},
    config::Config,
    observability,
    store::EventStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config: {}. Using defaults.", e);
        Config::default()
    });

    // Initialize logging and metrics
    observability::init(&config.observability);
    let metrics_handle = observability::init_metrics()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting webhook capture server"
    );

    // Open the event store; creates the data directory if absent
    let store = Arc::new(EventStore::open(
        &config.storage.data_dir,
        config.capture.max_events,
    )?);
    tracing::info!(
        data_dir = %store.data_dir().display(),
        max_events = config.capture.max_events,
        "Event store ready"
    );

    // Build router
    let state = AppState::new(store, &config.capture.path).with_metrics(metrics_handle);
    let capture_path = state.capture_path.clone();
    let app = build_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Webhook capture server started");
    tracing::info!("Capture endpoint: POST http://localhost:{}{}", config.server.port, capture_path);
    tracing::info!("Viewer: http://localhost:{}/visualization", config.server.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
