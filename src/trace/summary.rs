//! Summary aggregation over reconstructed spans

use crate::types::{Span, Summary};

/// Reduce spans to aggregate counters
///
/// `actors` holds one entry per span in opening order, duplicates kept.
pub fn summarize(spans: &[Span], trace_id: Option<String>) -> Summary {
    spans.iter().fold(
        Summary {
            trace_id,
            ..Default::default()
        },
        |mut summary, span| {
            summary.total_spans += 1;
            summary.total_duration_ms += span.duration_ms.unwrap_or(0);
            summary.total_tool_calls += span.tool_call_count();
            summary.total_llm_calls += span.llm_call_count();
            summary.actors.push(span.actor.clone());
            summary
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChildCall, LlmInvocation, Payload, ToolInvocation};
    use chrono::Utc;

    fn span(actor: &str, duration_ms: Option<u64>, tools: usize, llms: usize) -> Span {
        let now = Utc::now();
        let mut span = Span::open(format!("{}-id", actor), actor.to_string(), now);
        span.duration_ms = duration_ms;
        for _ in 0..tools {
            span.children.push(ChildCall::Tool(ToolInvocation {
                tool: "FileReader".into(),
                method: "read_file".into(),
                payload: Payload::new(),
                timestamp: now,
            }));
        }
        for _ in 0..llms {
            span.children.push(ChildCall::Llm(LlmInvocation {
                model: None,
                tokens: None,
                latency_ms: None,
                response_preview: None,
                response_length: None,
                timestamp: now,
            }));
        }
        span
    }

    #[test]
    fn test_empty_is_all_zero() {
        let summary = summarize(&[], None);
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn test_totals() {
        let spans = vec![
            span("RCA Agent", Some(120), 3, 1),
            span("Fix Agent", None, 0, 2),
            span("RCA Agent", Some(30), 1, 0),
        ];
        let summary = summarize(&spans, Some("t1".into()));

        assert_eq!(summary.trace_id.as_deref(), Some("t1"));
        assert_eq!(summary.total_spans, 3);
        assert_eq!(summary.total_duration_ms, 150);
        assert_eq!(summary.total_tool_calls, 4);
        assert_eq!(summary.total_llm_calls, 3);
        assert_eq!(summary.actors, vec!["RCA Agent", "Fix Agent", "RCA Agent"]);
    }
}
