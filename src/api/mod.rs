//! HTTP layer: application state and router.
//!
//! Every endpoint is a thin adapter over the [`EventStore`]. Route order
//! matters only on paper: axum's router prefers static segments over
//! captures, so `/webhooks/latest/last`, `/webhooks/files`, and
//! `/webhooks/file/:filename` all win over `/webhooks/:id` regardless of
//! registration order.

mod dashboard;
mod handlers;

use std::sync::Arc;

use axum::{
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::store::EventStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EventStore>,
    /// Route the capture endpoint is served on; shown on the dashboard.
    pub capture_path: String,
    /// Render handle for the Prometheus exposition endpoint.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(store: Arc<EventStore>, capture_path: impl Into<String>) -> Self {
        Self {
            store,
            capture_path: normalize_path(capture_path.into()),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

fn normalize_path(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    }
}

/// Build the full router: capture endpoint, window queries, durable record
/// queries, health, metrics, and the HTML viewer.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let capture_path = state.capture_path.clone();

    Router::new()
        .route(
            &capture_path,
            get(handlers::capture_webhook_get).post(handlers::capture_webhook),
        )
        .route(
            "/webhooks",
            get(handlers::list_webhooks).delete(handlers::clear_webhooks),
        )
        .route("/webhooks/latest/last", get(handlers::latest_webhook))
        .route("/webhooks/files", get(handlers::list_files))
        .route("/webhooks/file/:filename", get(handlers::read_file))
        .route("/webhooks/:id", get(handlers::get_webhook))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::prometheus_metrics))
        .route("/visualization", get(dashboard::visualization))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
