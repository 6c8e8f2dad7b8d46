//! Event log endpoints

use std::sync::Arc;

use axum::{extract::State, response::Response, Json};
use serde_json::Value;

use super::run_blocking;
use crate::api::state::AppState;
use crate::event_store::{LogStats, StatsCollector};

/// GET /events - Raw event records in log order, unmodified
pub async fn get_events(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Value>>, Response> {
    let records = run_blocking(move || state.events.read_raw()).await?;
    Ok(Json(records))
}

/// GET /events/stats - Counts and size of the current log
pub async fn get_event_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LogStats>, Response> {
    let stats = run_blocking(move || StatsCollector::new(&state.events).collect()).await?;
    Ok(Json(stats))
}
