//! Request handlers.
//!
//! All fallible handlers return `Result<impl IntoResponse, CaptureError>`;
//! errors are converted to the JSON error shape via `IntoResponse` on
//! [`CaptureError`].

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{OriginalUri, Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use super::AppState;
use crate::error::CaptureError;
use crate::event::Event;
use crate::pagination::PageQuery;
use crate::store::RecordInfo;

// ═══════════════════════════════════════════════════════════════════════════════
// Capture
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
pub struct CaptureResponse {
    pub success: bool,
    pub message: &'static str,
    pub id: String,
    pub saved_file: Option<String>,
}

/// POST capture: record the request including its body.
///
/// The body is taken as raw bytes so any sender is accepted: valid JSON is
/// stored structurally, anything else as a string, an empty body as null.
pub async fn capture_webhook(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let body = Some(parse_body(&body));
    let captured = state
        .store
        .capture("POST", uri.path(), header_map(&headers), query, body)
        .await;

    Json(CaptureResponse {
        success: true,
        message: "Webhook received",
        id: captured.event.id,
        saved_file: captured.saved_file,
    })
}

/// GET capture: same semantics without a body field.
pub async fn capture_webhook_get(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let captured = state
        .store
        .capture("GET", uri.path(), header_map(&headers), query, None)
        .await;

    Json(CaptureResponse {
        success: true,
        message: "Webhook received",
        id: captured.event.id,
        saved_file: captured.saved_file,
    })
}

fn parse_body(bytes: &Bytes) -> serde_json::Value {
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Window queries
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
pub struct ListResponse {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub data: Vec<Event>,
}

pub async fn list_webhooks(
    State(state): State<AppState>,
    query: PageQuery,
) -> impl IntoResponse {
    let page = state.store.list(query.limit(), query.offset);

    Json(ListResponse {
        total: page.total,
        limit: page.limit,
        offset: page.offset,
        data: page.data,
    })
}

pub async fn latest_webhook(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, CaptureError> {
    let event = state
        .store
        .latest()
        .ok_or_else(CaptureError::window_empty)?;

    Ok(Json(event))
}

pub async fn get_webhook(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, CaptureError> {
    let event = state
        .store
        .get_by_id(&id)
        .ok_or_else(|| CaptureError::event_not_found(&id))?;

    Ok(Json(event))
}

#[derive(Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
    pub removed: usize,
}

pub async fn clear_webhooks(State(state): State<AppState>) -> impl IntoResponse {
    let removed = state.store.clear();

    Json(ClearResponse {
        success: true,
        message: format!("{} webhooks removed", removed),
        removed,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Durable record queries
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
pub struct FilesResponse {
    pub total: usize,
    pub files: Vec<RecordInfo>,
}

pub async fn list_files(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, CaptureError> {
    let files = state.store.list_persisted().await?;

    Ok(Json(FilesResponse {
        total: files.len(),
        files,
    }))
}

pub async fn read_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, CaptureError> {
    let event = state.store.read_persisted(&filename).await?;
    Ok(Json(event))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Health and metrics
// ═══════════════════════════════════════════════════════════════════════════════

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "webhooks_count": state.store.count(),
    }))
}

pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = state.metrics.as_ref().map(|h| h.render()).unwrap_or_default();

    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_json() {
        let body = Bytes::from_static(b"{\"a\": 1}");
        assert_eq!(parse_body(&body), serde_json::json!({"a": 1}));
    }

    #[test]
    fn test_parse_body_plain_text() {
        let body = Bytes::from_static(b"hello=world");
        assert_eq!(
            parse_body(&body),
            serde_json::Value::String("hello=world".into())
        );
    }

    #[test]
    fn test_parse_body_empty() {
        assert_eq!(parse_body(&Bytes::new()), serde_json::Value::Null);
    }

    #[test]
    fn test_header_map_lowercases_names() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Custom", "value".parse().unwrap());

        let map = header_map(&headers);
        assert_eq!(map.get("x-custom").map(String::as_str), Some("value"));
    }
}
