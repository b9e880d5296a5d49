//! Limit/offset pagination for the window listing.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

use crate::error::CaptureError;

/// Default page size when the query string gives none.
pub const DEFAULT_LIMIT: usize = 50;

/// Upper bound on a single page.
pub const MAX_LIMIT: usize = 1000;

/// Query-string pagination parameters (`?limit=&offset=`).
///
/// Extracted straight from the request; malformed values are rejected as a
/// JSON `{success: false}` error rather than axum's plain-text 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,

    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl PageQuery {
    /// Effective limit: zero means "not given" and falls back to the
    /// default; anything else is capped at [`MAX_LIMIT`].
    pub fn limit(&self) -> usize {
        if self.limit == 0 {
            DEFAULT_LIMIT
        } else {
            self.limit.min(MAX_LIMIT)
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = CaptureError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| CaptureError::invalid_input(e.body_text()))?;
        Ok(query)
    }
}
