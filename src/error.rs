//! Error handling for the capture service.
//!
//! A single [`CaptureError`] type carries a machine-readable [`ErrorCode`],
//! a user-facing message safe to return to clients, and an optional internal
//! message plus source for logging. Every handler returns
//! `Result<_, CaptureError>`; the `IntoResponse` impl converts failures at
//! the boundary into the JSON error shape `{success: false, message, error?}`
//! with the mapped HTTP status. No failure propagates as an unhandled fault.

use std::borrow::Cow;
use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metrics::counter;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

/// A specialized Result type for capture operations.
pub type Result<T> = std::result::Result<T, CaptureError>;

/// Machine-readable error codes, stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Requested event is not in the in-memory window.
    EventNotFound,
    /// Requested durable record does not exist.
    RecordNotFound,
    /// Durable record exists but failed to parse.
    CorruptRecord,
    /// Writing a durable record failed during capture.
    StorageWriteFailed,
    /// Enumerating durable records failed.
    EnumerationFailed,
    /// Request input was malformed (bad pagination values, unsafe keys).
    InvalidInput,
    /// Serializing an event failed.
    SerializationError,
    /// Anything else.
    InternalError,
}

impl ErrorCode {
    /// HTTP status this code maps to.
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::EventNotFound | Self::RecordNotFound => StatusCode::NOT_FOUND,
            Self::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
            Self::CorruptRecord
            | Self::StorageWriteFailed
            | Self::EnumerationFailed
            | Self::SerializationError
            | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Category label for metrics grouping.
    pub const fn category(&self) -> &'static str {
        match self {
            Self::EventNotFound => "window",
            Self::RecordNotFound | Self::CorruptRecord => "record",
            Self::StorageWriteFailed | Self::EnumerationFailed => "storage",
            Self::InvalidInput => "validation",
            Self::SerializationError | Self::InternalError => "internal",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The main error type for the capture service.
#[derive(Error, Debug)]
pub struct CaptureError {
    /// Machine-readable error code.
    code: ErrorCode,

    /// User-facing message, safe to expose to clients.
    message: Cow<'static, str>,

    /// Detailed internal message, for logging only.
    internal: Option<String>,

    /// The source error that caused this one.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref internal) = self.internal {
            write!(f, " (internal: {})", internal)?;
        }
        Ok(())
    }
}

impl CaptureError {
    /// Create a new error with code and user message.
    pub fn new(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self {
        let error = Self {
            code,
            message: message.into(),
            internal: None,
            source: None,
        };
        error.record_metrics();
        error
    }

    /// An event missing from the in-memory window.
    pub fn event_not_found(id: &str) -> Self {
        Self::new(ErrorCode::EventNotFound, "Webhook not found")
            .with_internal(format!("no event with id {} in window", id))
    }

    /// A latest-event query against an empty window.
    pub fn window_empty() -> Self {
        Self::new(ErrorCode::EventNotFound, "No webhooks received yet")
    }

    /// A durable record missing from storage.
    pub fn record_not_found(key: &str) -> Self {
        Self::new(ErrorCode::RecordNotFound, "File not found")
            .with_internal(format!("no record file {}", key))
    }

    /// A durable record that exists but fails to parse.
    pub fn corrupt_record(key: &str, source: serde_json::Error) -> Self {
        Self::new(ErrorCode::CorruptRecord, "Failed to read file")
            .with_internal(format!("record {} failed to deserialize", key))
            .with_source(source)
    }

    /// A failed durable write during capture.
    pub fn storage_write(key: &str, source: std::io::Error) -> Self {
        Self::new(ErrorCode::StorageWriteFailed, "Failed to save webhook")
            .with_internal(format!("write of {} failed", key))
            .with_source(source)
    }

    /// A failed enumeration of durable records.
    pub fn enumeration(source: std::io::Error) -> Self {
        Self::new(ErrorCode::EnumerationFailed, "Failed to list files").with_source(source)
    }

    /// A malformed request input.
    pub fn invalid_input(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// An unexpected internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, "An internal error occurred").with_internal(message)
    }

    /// Attach an internal message.
    pub fn with_internal(mut self, message: impl Into<String>) -> Self {
        self.internal = Some(message.into());
        self
    }

    /// Attach a source error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the user-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Log this error at a level matching its weight.
    pub fn log(&self) {
        let code = self.code.to_string();
        let status = self.http_status().as_u16();

        match self.http_status() {
            StatusCode::INTERNAL_SERVER_ERROR => error!(
                error_code = %code,
                http_status = status,
                message = %self.message,
                internal = ?self.internal,
                source = ?self.source,
                "Request failed"
            ),
            StatusCode::UNPROCESSABLE_ENTITY => warn!(
                error_code = %code,
                http_status = status,
                message = %self.message,
                "Request rejected"
            ),
            _ => debug!(
                error_code = %code,
                http_status = status,
                message = %self.message,
                "Request failed"
            ),
        }
    }

    fn record_metrics(&self) {
        counter!(
            "capture_errors_total",
            "code" => self.code.to_string(),
            "category" => self.code.category().to_string(),
        )
        .increment(1);
    }
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    /// Detail string for 5xx conditions (corrupt records, storage faults).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&CaptureError> for ErrorResponse {
    fn from(error: &CaptureError) -> Self {
        let detail = match error.code {
            ErrorCode::CorruptRecord
            | ErrorCode::EnumerationFailed
            | ErrorCode::StorageWriteFailed
            | ErrorCode::SerializationError
            | ErrorCode::InternalError => error
                .source
                .as_ref()
                .map(|s| s.to_string())
                .or_else(|| error.internal.clone()),
            _ => None,
        };

        Self {
            success: false,
            message: error.message.to_string(),
            error: detail,
        }
    }
}

impl IntoResponse for CaptureError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.http_status();
        let body = ErrorResponse::from(&self);
        (status, Json(body)).into_response()
    }
}

impl From<serde_json::Error> for CaptureError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, "Serialization failed").with_source(error)
    }
}
