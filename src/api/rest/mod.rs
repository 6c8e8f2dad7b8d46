//! REST API module for HTTP endpoints
//!
//! - `GET /trace` - Reconstructed spans and summary
//! - `GET /diff` - Structured diff between two artifacts
//! - `GET /results` - Raw result store, plus `analysis` / `fixes` projections
//! - `GET /events` - Raw event log, plus `stats`

pub mod diff;
pub mod events;
pub mod results;
pub mod traces;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

/// Response body stamped with the time it was computed
#[derive(Debug, Serialize)]
pub struct Timestamped<T> {
    #[serde(flatten)]
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

impl<T> Timestamped<T> {
    pub fn now(data: T) -> Self {
        Self {
            data,
            timestamp: crate::utils::now_utc(),
        }
    }
}

/// Run file reads and diffing on the blocking pool
///
/// A panicked task becomes a 500 with a JSON error body.
pub async fn run_blocking<T, F>(work: F) -> Result<T, Response>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        tracing::error!(error = %e, "blocking handler task failed");
        let body = json!({"error": "internal error"});
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    })
}
