//! Diff endpoint

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{run_blocking, Timestamped};
use crate::api::state::AppState;
use crate::diff::diff_texts_with_context;
use crate::types::{ChangeCounts, DiffLine};

/// Status reported when either artifact is unavailable
pub const STATUS_PENDING: &str = "pending";

/// Status reported for an explicit comparison with both artifacts present
pub const STATUS_READY: &str = "ready";

/// Query parameters for the diff endpoint
#[derive(Debug, Default, Deserialize)]
pub struct DiffParams {
    /// Original artifact name; defaults to `rca.affected_file`
    pub original: Option<String>,
    /// Modified artifact name; defaults to `patch.fixed_file`
    pub modified: Option<String>,
    /// `unified` adds the rendered unified-diff text
    pub format: Option<DiffFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffFormat {
    Lines,
    Unified,
}

/// One side of the comparison
#[derive(Debug, Serialize)]
pub struct ArtifactView {
    pub name: Option<String>,
    pub content: Option<String>,
}

/// Response for GET /diff
#[derive(Debug, Serialize)]
pub struct DiffResponse {
    pub original: ArtifactView,
    pub modified: ArtifactView,
    pub diff: Vec<DiffLine>,
    pub changes_count: ChangeCounts,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unified: Option<String>,
}

/// GET /diff - Compare two text artifacts
///
/// Names missing from the query resolve through the result store. When
/// either artifact is unavailable the diff is empty and the status is
/// `pending`. Artifact reads and the diff itself run on the blocking pool.
pub async fn get_diff(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DiffParams>,
) -> Result<Json<Timestamped<DiffResponse>>, Response> {
    let response = run_blocking(move || compare(&state, params)).await?;
    Ok(Json(Timestamped::now(response)))
}

fn compare(state: &AppState, params: DiffParams) -> DiffResponse {
    let explicit = params.original.is_some() || params.modified.is_some();
    let patch = state.results.patch_info();

    let original_name = params.original.or(patch.affected_file);
    let modified_name = params.modified.or(patch.fixed_file);

    let original = original_name.as_deref().and_then(|name| state.originals.fetch(name));
    let modified = modified_name.as_deref().and_then(|name| state.modified.fetch(name));

    let (diff, changes_count, status, unified) = match (&original, &modified) {
        (Some(before), Some(after)) => {
            let result = diff_texts_with_context(before, after, state.diff_context);
            let status = if explicit {
                STATUS_READY.to_string()
            } else {
                patch.status.unwrap_or_else(|| STATUS_READY.to_string())
            };
            let unified = (params.format == Some(DiffFormat::Unified)).then(|| {
                result.to_unified(
                    original_name.as_deref().unwrap_or("original"),
                    modified_name.as_deref().unwrap_or("modified"),
                )
            });
            (result.lines(), result.changes_count, status, unified)
        }
        _ => {
            tracing::debug!(
                original = ?original_name,
                modified = ?modified_name,
                "diff artifacts unavailable, reporting pending"
            );
            (Vec::new(), ChangeCounts::default(), STATUS_PENDING.to_string(), None)
        }
    };

    DiffResponse {
        original: ArtifactView {
            name: original_name,
            content: original,
        },
        modified: ArtifactView {
            name: modified_name,
            content: modified,
        },
        diff,
        changes_count,
        status,
        unified,
    }
}
