//! Trace endpoint

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};
use serde::Deserialize;

use super::run_blocking;
use crate::api::state::AppState;
use crate::trace::build_trace;
use crate::types::Trace;

/// Query parameters for the trace endpoint
#[derive(Debug, Deserialize)]
pub struct TraceParams {
    /// Restrict to events carrying this correlation id
    #[serde(default)]
    pub trace_id: Option<String>,
}

/// GET /trace - Rebuild spans from the current event log
pub async fn get_trace(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TraceParams>,
) -> Result<Json<Trace>, Response> {
    let trace = run_blocking(move || {
        let log = state.events.read_all();
        let trace_id = params.trace_id.as_deref().filter(|id| !id.is_empty());
        build_trace(&log, trace_id)
    })
    .await?;

    tracing::debug!(
        spans = trace.spans.len(),
        orphaned = trace.diagnostics.orphaned_events,
        malformed = trace.diagnostics.malformed_events,
        "rebuilt trace"
    );

    Ok(Json(trace))
}
