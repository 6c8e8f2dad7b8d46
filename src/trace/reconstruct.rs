//! Span reconstruction
//!
//! A single left-to-right pass over the event log. At most one span is open
//! at a time: child events are attributed to whichever span is currently
//! open, not through explicit parent links. This is only correct because the
//! producing pipeline runs its stages sequentially; overlapping lifecycle
//! units in one log would have their children misattributed.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::types::{
    AgentEvent, ChildCall, Event, EventBody, LlmInvocation, LlmResponse, Payload, Span, SpanStatus,
    ToolInvocation,
};
use crate::utils::millis_between;

/// Longest response prefix kept in an LLM invocation preview
pub const RESPONSE_PREVIEW_CHARS: usize = 200;

const TRUNCATION_MARKER: &str = "...";

/// Output of a reconstruction pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconstruction {
    /// Spans in the order their `start` events appeared
    pub spans: Vec<Span>,
    /// Child/terminal events that arrived with no open span
    pub orphaned: usize,
}

/// Accumulator threaded through the pass
#[derive(Default)]
struct PassState {
    spans: Vec<Span>,
    /// Index into `spans` of the open span
    current: Option<usize>,
    orphaned: usize,
}

impl PassState {
    fn current_span(&mut self) -> Option<&mut Span> {
        match self.current {
            Some(index) => self.spans.get_mut(index),
            None => None,
        }
    }

    fn orphan(&mut self, event: &Event) {
        tracing::debug!(
            actor = %event.actor,
            label = event.label(),
            "dropping event with no open span"
        );
        self.orphaned += 1;
    }

    fn apply(&mut self, position: usize, event: &Event) {
        match &event.body {
            EventBody::Agent(AgentEvent::Start { payload }) => {
                let span_id = event
                    .span_id
                    .clone()
                    .unwrap_or_else(|| format!("span-{}", position));
                let mut span = Span::open(span_id, event.actor.clone(), event.timestamp);
                span.input = start_input(payload);
                self.spans.push(span);
                self.current = Some(self.spans.len() - 1);
            }
            EventBody::Agent(AgentEvent::Input { payload }) => match self.current_span() {
                Some(span) => span.input = Some(input_value(payload)),
                None => self.orphan(event),
            },
            EventBody::Agent(AgentEvent::LlmResponse { response }) => match self.current_span() {
                Some(span) => {
                    let call = response_invocation(response, event.timestamp);
                    span.children.push(ChildCall::Llm(call));
                }
                None => self.orphan(event),
            },
            EventBody::Agent(AgentEvent::Complete {
                output,
                duration_ms,
                ..
            }) => match self.current_span() {
                Some(span) => {
                    close(span, event.timestamp, *duration_ms, SpanStatus::Success);
                    span.output = output.clone();
                    self.current = None;
                }
                None => self.orphan(event),
            },
            EventBody::Agent(AgentEvent::Error {
                duration_ms,
                payload,
            }) => match self.current_span() {
                Some(span) => {
                    close(span, event.timestamp, *duration_ms, SpanStatus::Error);
                    if !payload.is_empty() {
                        span.output = Some(Value::Object(payload.clone()));
                    }
                    self.current = None;
                }
                None => self.orphan(event),
            },
            EventBody::Agent(AgentEvent::Other { .. }) => {}
            EventBody::ToolCall { method, payload } => match self.current_span() {
                Some(span) => span.children.push(ChildCall::Tool(ToolInvocation {
                    tool: event.actor.clone(),
                    method: method.clone(),
                    payload: payload.clone(),
                    timestamp: event.timestamp,
                })),
                None => self.orphan(event),
            },
            EventBody::LlmCall {
                model,
                tokens,
                latency_ms,
            } => match self.current_span() {
                Some(span) => span.children.push(ChildCall::Llm(LlmInvocation {
                    model: Some(model.clone()),
                    tokens: tokens.clone(),
                    latency_ms: *latency_ms,
                    response_preview: None,
                    response_length: None,
                    timestamp: event.timestamp,
                })),
                None => self.orphan(event),
            },
        }
    }

    fn finish(mut self) -> Reconstruction {
        for span in &mut self.spans {
            span.children.sort_by_key(|child| *child.timestamp());
        }
        Reconstruction {
            spans: self.spans,
            orphaned: self.orphaned,
        }
    }
}

/// Rebuild spans from an ordered event sequence
///
/// With `trace_id` set, only events carrying that id take part. Pure: the
/// same input always yields the same output, including generated span ids
/// (`span-<position of the start event>`).
pub fn reconstruct(events: &[Event], trace_id: Option<&str>) -> Reconstruction {
    let mut state = PassState::default();

    for (position, event) in events.iter().enumerate() {
        if let Some(wanted) = trace_id {
            if event.trace_id.as_deref() != Some(wanted) {
                continue;
            }
        }
        state.apply(position, event);
    }

    state.finish()
}

fn close(span: &mut Span, at: DateTime<Utc>, duration_ms: Option<u64>, status: SpanStatus) {
    let end_time = at.max(span.start_time);
    span.duration_ms =
        Some(duration_ms.unwrap_or_else(|| millis_between(&span.start_time, &end_time)));
    span.end_time = Some(end_time);
    span.status = status;
}

fn input_value(payload: &Payload) -> Value {
    payload
        .get("input_file")
        .cloned()
        .unwrap_or_else(|| Value::Object(payload.clone()))
}

fn start_input(payload: &Payload) -> Option<Value> {
    if payload.is_empty() {
        None
    } else {
        Some(input_value(payload))
    }
}

fn response_invocation(response: &LlmResponse, timestamp: DateTime<Utc>) -> LlmInvocation {
    let (preview, length) = match response {
        LlmResponse::Text(text) => {
            let length = text.chars().count();
            (Some(preview(text, length)), Some(length as u64))
        }
        LlmResponse::Length(length) => (None, Some(*length)),
    };

    LlmInvocation {
        model: None,
        tokens: None,
        latency_ms: None,
        response_preview: preview,
        response_length: length,
        timestamp,
    }
}

fn preview(text: &str, length: usize) -> String {
    if length <= RESPONSE_PREVIEW_CHARS {
        return text.to_string();
    }
    let mut out: String = text.chars().take(RESPONSE_PREVIEW_CHARS).collect();
    out.push_str(TRUNCATION_MARKER);
    out
}
