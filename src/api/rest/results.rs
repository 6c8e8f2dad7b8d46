//! Result store endpoints

use std::sync::Arc;

use axum::{extract::State, response::Response, Json};
use serde_json::Value;

use super::{run_blocking, Timestamped};
use crate::api::state::AppState;
use crate::result_store::{Analysis, FixPlan};

/// GET /results - Raw result mapping, unmodified
pub async fn get_results(State(state): State<Arc<AppState>>) -> Result<Json<Value>, Response> {
    let results = run_blocking(move || state.results.read_all()).await?;
    Ok(Json(Value::Object(results)))
}

/// GET /results/analysis - Root-cause analysis projection
pub async fn get_analysis(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Timestamped<Analysis>>, Response> {
    let analysis = run_blocking(move || state.results.analysis()).await?;
    Ok(Json(Timestamped::now(analysis)))
}

/// GET /results/fixes - Fix plan projection
pub async fn get_fixes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Timestamped<FixPlan>>, Response> {
    let fixes = run_blocking(move || state.results.fix_plan()).await?;
    Ok(Json(Timestamped::now(fixes)))
}
