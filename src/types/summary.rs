//! Trace summary types

use serde::{Deserialize, Serialize, Serializer};

use super::span::Span;

/// Aggregate counters over a trace's spans
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub trace_id: Option<String>,
    pub total_spans: usize,
    /// Sum of every non-null span duration
    pub total_duration_ms: u64,
    pub total_tool_calls: usize,
    pub total_llm_calls: usize,
    /// One entry per span, in opening order
    pub actors: Vec<String>,
}

/// Records dropped while reconstructing a trace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Child or terminal events that arrived with no open span
    pub orphaned_events: usize,
    /// Records that failed to decode against their variant's schema
    pub malformed_events: usize,
}

/// Ordered spans sharing a correlation id, plus their summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub trace_id: Option<String>,
    pub spans: Vec<Span>,
    /// Serialized as `{}` for a trace with no spans
    #[serde(serialize_with = "summary_or_empty")]
    pub summary: Option<Summary>,
    pub diagnostics: Diagnostics,
}

fn summary_or_empty<S: Serializer>(
    summary: &Option<Summary>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match summary {
        Some(summary) => summary.serialize(serializer),
        None => serde_json::Map::new().serialize(serializer),
    }
}
