//! Producer-side trace recorder
//!
//! Pipeline stages use a [`TraceRecorder`] to append well-formed events. The
//! active trace and open span live in an explicit [`TraceContext`] owned by
//! the recorder, so independent pipelines in one process never share state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::store::{EventStore, StoreResult};
use crate::types::{AgentEvent, Event, Payload, TokenUsage};
use crate::utils::{millis_between, now_utc};

/// Generate a short unique id for traces and spans
pub fn generate_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(12);
    id
}

#[derive(Debug, Clone)]
struct OpenSpan {
    span_id: String,
    started: DateTime<Utc>,
}

impl OpenSpan {
    fn elapsed_ms(&self, now: &DateTime<Utc>) -> u64 {
        millis_between(&self.started, now)
    }
}

/// Correlation state for one pipeline run
#[derive(Debug, Clone, Default)]
pub struct TraceContext {
    trace_id: Option<String>,
    current: Option<OpenSpan>,
}

impl TraceContext {
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    pub fn current_span_id(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.span_id.as_str())
    }
}

/// Appends events for one pipeline run
pub struct TraceRecorder {
    store: Arc<EventStore>,
    context: TraceContext,
}

impl TraceRecorder {
    pub fn new(store: Arc<EventStore>) -> Self {
        Self {
            store,
            context: TraceContext::default(),
        }
    }

    pub fn context(&self) -> &TraceContext {
        &self.context
    }

    /// Begin a new trace and return its id
    pub fn start_trace(&mut self) -> String {
        let trace_id = generate_id();
        self.context.trace_id = Some(trace_id.clone());
        self.context.current = None;
        trace_id
    }

    /// Record a stage lifecycle event
    ///
    /// `start` opens a span with a fresh id; `complete` and `error` close the
    /// open span and fill in `duration_ms` when the caller left it empty.
    pub fn agent_event(&mut self, actor: &str, event: AgentEvent) -> StoreResult<Event> {
        let now = now_utc();

        let (span_id, event) = match event {
            AgentEvent::Start { payload } => {
                let span_id = generate_id();
                self.context.current = Some(OpenSpan {
                    span_id: span_id.clone(),
                    started: now,
                });
                (Some(span_id), AgentEvent::Start { payload })
            }
            AgentEvent::Complete {
                output,
                duration_ms,
                payload,
            } => {
                let open = self.context.current.take();
                let duration_ms = duration_ms.or_else(|| open.as_ref().map(|s| s.elapsed_ms(&now)));
                (
                    open.map(|s| s.span_id),
                    AgentEvent::Complete {
                        output,
                        duration_ms,
                        payload,
                    },
                )
            }
            AgentEvent::Error {
                duration_ms,
                payload,
            } => {
                let open = self.context.current.take();
                let duration_ms = duration_ms.or_else(|| open.as_ref().map(|s| s.elapsed_ms(&now)));
                (open.map(|s| s.span_id), AgentEvent::Error { duration_ms, payload })
            }
            other => (self.context.current_span_id().map(str::to_string), other),
        };

        let event = Event::agent(actor, event)
            .at(now)
            .with_trace(self.context.trace_id.clone())
            .with_span(span_id);
        self.store.append(&event)?;
        Ok(event)
    }

    /// Record a tool call against the open span
    pub fn tool_call(&mut self, tool: &str, method: &str, payload: Payload) -> StoreResult<Event> {
        let event = Event::tool_call(tool, method, payload)
            .with_trace(self.context.trace_id.clone())
            .with_span(self.context.current_span_id().map(str::to_string));
        self.store.append(&event)?;
        Ok(event)
    }

    /// Record LLM token and latency accounting against the open span
    pub fn llm_call(
        &mut self,
        actor: &str,
        model: &str,
        prompt_tokens: Option<u64>,
        completion_tokens: Option<u64>,
        latency_ms: Option<u64>,
    ) -> StoreResult<Event> {
        let tokens = TokenUsage::new(prompt_tokens, completion_tokens);
        let event = Event::llm_call(actor, model, Some(tokens), latency_ms)
            .with_trace(self.context.trace_id.clone())
            .with_span(self.context.current_span_id().map(str::to_string));
        self.store.append(&event)?;
        Ok(event)
    }

    /// Convenience for `complete` with an output value
    pub fn complete(&mut self, actor: &str, output: Value) -> StoreResult<Event> {
        self.agent_event(
            actor,
            AgentEvent::Complete {
                output: Some(output),
                duration_ms: None,
                payload: Payload::new(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_store::EventStoreConfig;
    use crate::types::EventBody;
    use serde_json::json;
    use tempfile::TempDir;

    fn recorder() -> (TraceRecorder, Arc<EventStore>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(EventStore::with_config(EventStoreConfig::new(temp_dir.path())));
        (TraceRecorder::new(store.clone()), store, temp_dir)
    }

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id();
        assert_eq!(id.len(), 12);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, generate_id());
    }

    #[test]
    fn test_span_ids_follow_lifecycle() {
        let (mut recorder, store, _temp_dir) = recorder();
        let trace_id = recorder.start_trace();

        let start = recorder
            .agent_event("RCA Agent", AgentEvent::Start { payload: Payload::new() })
            .unwrap();
        let call = recorder.tool_call("FileReader", "read_file", Payload::new()).unwrap();
        let done = recorder.complete("RCA Agent", json!("done")).unwrap();

        assert!(start.span_id.is_some());
        assert_eq!(call.span_id, start.span_id);
        assert_eq!(done.span_id, start.span_id);
        assert!(recorder.context().current_span_id().is_none());

        let log = store.read_all();
        assert_eq!(log.events.len(), 3);
        assert!(log.events.iter().all(|e| e.trace_id.as_deref() == Some(trace_id.as_str())));
    }

    #[test]
    fn test_complete_fills_duration() {
        let (mut recorder, _store, _temp_dir) = recorder();
        recorder.start_trace();
        recorder
            .agent_event("Fix Agent", AgentEvent::Start { payload: Payload::new() })
            .unwrap();
        let done = recorder.complete("Fix Agent", json!({})).unwrap();

        match done.body {
            EventBody::Agent(AgentEvent::Complete { duration_ms, .. }) => {
                assert!(duration_ms.is_some())
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn test_llm_call_records_tokens() {
        let (mut recorder, _store, _temp_dir) = recorder();
        let event = recorder
            .llm_call("Patch Agent", "gpt-4o", Some(100), Some(50), Some(1200))
            .unwrap();

        match event.body {
            EventBody::LlmCall { tokens, latency_ms, .. } => {
                assert_eq!(tokens.and_then(|t| t.total), Some(150));
                assert_eq!(latency_ms, Some(1200));
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }
}
