//! Trace building: span reconstruction plus summary aggregation

mod reconstruct;
mod summary;

pub use reconstruct::{reconstruct, Reconstruction, RESPONSE_PREVIEW_CHARS};
pub use summary::summarize;

use crate::event_store::DecodedLog;
use crate::types::{Diagnostics, Trace};

/// Build the trace view for a decoded log snapshot
///
/// The trace id is the requested one, or else the first id seen in the log.
pub fn build_trace(log: &DecodedLog, trace_id: Option<&str>) -> Trace {
    let Reconstruction { spans, orphaned } = reconstruct(&log.events, trace_id);

    let trace_id = trace_id
        .map(str::to_string)
        .or_else(|| log.events.iter().find_map(|e| e.trace_id.clone()));

    let summary = if spans.is_empty() {
        None
    } else {
        Some(summarize(&spans, trace_id.clone()))
    };

    Trace {
        trace_id,
        spans,
        summary,
        diagnostics: Diagnostics {
            orphaned_events: orphaned,
            malformed_events: log.malformed,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgentEvent, Event, Payload};
    use serde_json::json;

    #[test]
    fn test_empty_log_serializes_empty_summary() {
        let trace = build_trace(&DecodedLog::default(), None);
        let value = serde_json::to_value(&trace).unwrap();
        assert_eq!(value["spans"], json!([]));
        assert_eq!(value["summary"], json!({}));
    }

    #[test]
    fn test_trace_id_falls_back_to_first_seen() {
        let log = DecodedLog {
            events: vec![
                Event::tool_call("FileReader", "read_file", Payload::new()),
                Event::agent("RCA Agent", AgentEvent::Start { payload: Payload::new() })
                    .with_trace(Some("abc123".into())),
            ],
            malformed: 2,
        };
        let trace = build_trace(&log, None);
        assert_eq!(trace.trace_id.as_deref(), Some("abc123"));
        assert_eq!(trace.summary.as_ref().map(|s| s.total_spans), Some(1));
        assert_eq!(trace.diagnostics.orphaned_events, 1);
        assert_eq!(trace.diagnostics.malformed_events, 2);
    }
}
