//! # Webhook Capture
//!
//! A webhook-capture utility: one HTTP endpoint accepts arbitrary inbound
//! requests and records each as a structured [`event::Event`]. The service
//! keeps a bounded recent-history window in memory, persists every event as
//! an individual JSON file, and serves read/list/delete endpoints plus a
//! polling HTML viewer.
//!
//! ## Architecture
//!
//! - **Event Store**: bounded newest-first window + durable per-event files
//! - **API**: axum handlers, all thin adapters over the store
//! - **Observability**: tracing logs, Prometheus counters behind `/metrics`

pub mod api;
pub mod config;
pub mod error;
pub mod event;
pub mod observability;
pub mod pagination;
pub mod store;

pub use error::{CaptureError, ErrorCode, Result};

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::api::{build_router, AppState};
    pub use crate::config::Config;
    pub use crate::error::{CaptureError, ErrorCode, Result};
    pub use crate::event::Event;
    pub use crate::pagination::PageQuery;
    pub use crate::store::{Captured, EventPage, EventStore, EventWindow, FileStore, RecordInfo};
}
