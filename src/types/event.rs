//! Event types for the pipeline event log
//!
//! Producers append flat JSON records to the log. Each record is decoded into
//! a typed [`Event`] whose [`EventBody`] is keyed by `(kind, label)` and only
//! carries the fields meaningful to that variant. A record that does not fit
//! its variant's shape is rejected with an [`EventDecodeError`] and treated as
//! malformed by readers; there is no partial acceptance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::utils::{format_timestamp, parse_timestamp};

/// Open key/value payload attached to an event
pub type Payload = Map<String, Value>;

/// Kind of producer that emitted an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A tool invocation (file read, code search, ...)
    ToolCall,
    /// A lifecycle event of a pipeline stage
    AgentEvent,
    /// An LLM API call with token and latency accounting
    LlmCall,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ToolCall => "tool_call",
            EventKind::AgentEvent => "agent_event",
            EventKind::LlmCall => "llm_call",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "tool_call" => Some(EventKind::ToolCall),
            "agent_event" => Some(EventKind::AgentEvent),
            "llm_call" => Some(EventKind::LlmCall),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token accounting for an LLM call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt: Option<u64>,
    #[serde(default)]
    pub completion: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl TokenUsage {
    /// Build usage from prompt/completion counts, deriving the total
    pub fn new(prompt: Option<u64>, completion: Option<u64>) -> Self {
        let total = match (prompt, completion) {
            (None, None) => None,
            (p, c) => Some(p.unwrap_or(0) + c.unwrap_or(0)),
        };
        Self {
            prompt,
            completion,
            total,
        }
    }
}

/// Body of an `llm_response` lifecycle event
#[derive(Debug, Clone, PartialEq)]
pub enum LlmResponse {
    /// Full response text
    Text(String),
    /// Only the response length was recorded
    Length(u64),
}

/// Stage lifecycle events, keyed by label
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    Start {
        payload: Payload,
    },
    Input {
        payload: Payload,
    },
    LlmResponse {
        response: LlmResponse,
    },
    Complete {
        output: Option<Value>,
        duration_ms: Option<u64>,
        payload: Payload,
    },
    Error {
        duration_ms: Option<u64>,
        payload: Payload,
    },
    /// Any other label; carried through but ignored by reconstruction
    Other {
        label: String,
        payload: Payload,
    },
}

impl AgentEvent {
    pub fn label(&self) -> &str {
        match self {
            AgentEvent::Start { .. } => "start",
            AgentEvent::Input { .. } => "input",
            AgentEvent::LlmResponse { .. } => "llm_response",
            AgentEvent::Complete { .. } => "complete",
            AgentEvent::Error { .. } => "error",
            AgentEvent::Other { label, .. } => label,
        }
    }
}

/// Typed event body
#[derive(Debug, Clone, PartialEq)]
pub enum EventBody {
    ToolCall {
        method: String,
        payload: Payload,
    },
    Agent(AgentEvent),
    LlmCall {
        model: String,
        tokens: Option<TokenUsage>,
        latency_ms: Option<u64>,
    },
}

/// One immutable record of the event log
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    /// Tool name or stage name
    pub actor: String,
    pub trace_id: Option<String>,
    /// Lifecycle unit the event belongs to
    pub span_id: Option<String>,
    pub body: EventBody,
}

/// Reasons a log record is classified as malformed
#[derive(Debug, Error)]
pub enum EventDecodeError {
    #[error("record does not match the event schema: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("missing timestamp")]
    MissingTimestamp,
    #[error("unparsable timestamp: {0}")]
    BadTimestamp(String),
    #[error("unknown event type: {0}")]
    UnknownKind(String),
    #[error("cannot determine event type")]
    UnclassifiedRecord,
    #[error("{0} event has no actor")]
    MissingActor(EventKind),
    #[error("{0} event has no label")]
    MissingLabel(EventKind),
    #[error("payload must be a JSON object")]
    PayloadNotObject,
    #[error("llm_call event has no model")]
    MissingModel,
    #[error("llm_response needs a string `response` or integer `response_length`")]
    BadLlmResponse,
}

/// Flat wire form of an event, as producers write it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default)]
    pub trace_id: Option<String>,
    #[serde(default)]
    pub span_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<TokenUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl Event {
    /// Create a tool call event stamped now
    pub fn tool_call(tool: impl Into<String>, method: impl Into<String>, payload: Payload) -> Self {
        Self {
            timestamp: crate::utils::now_utc(),
            actor: tool.into(),
            trace_id: None,
            span_id: None,
            body: EventBody::ToolCall {
                method: method.into(),
                payload,
            },
        }
    }

    /// Create a lifecycle event stamped now
    pub fn agent(actor: impl Into<String>, event: AgentEvent) -> Self {
        Self {
            timestamp: crate::utils::now_utc(),
            actor: actor.into(),
            trace_id: None,
            span_id: None,
            body: EventBody::Agent(event),
        }
    }

    /// Create an LLM call event stamped now
    pub fn llm_call(
        actor: impl Into<String>,
        model: impl Into<String>,
        tokens: Option<TokenUsage>,
        latency_ms: Option<u64>,
    ) -> Self {
        Self {
            timestamp: crate::utils::now_utc(),
            actor: actor.into(),
            trace_id: None,
            span_id: None,
            body: EventBody::LlmCall {
                model: model.into(),
                tokens,
                latency_ms,
            },
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_trace(mut self, trace_id: Option<String>) -> Self {
        self.trace_id = trace_id;
        self
    }

    pub fn with_span(mut self, span_id: Option<String>) -> Self {
        self.span_id = span_id;
        self
    }

    pub fn kind(&self) -> EventKind {
        match self.body {
            EventBody::ToolCall { .. } => EventKind::ToolCall,
            EventBody::Agent(_) => EventKind::AgentEvent,
            EventBody::LlmCall { .. } => EventKind::LlmCall,
        }
    }

    /// Method name for tool calls, lifecycle label for agent events
    pub fn label(&self) -> &str {
        match &self.body {
            EventBody::ToolCall { method, .. } => method,
            EventBody::Agent(event) => event.label(),
            EventBody::LlmCall { .. } => "llm_call",
        }
    }

    /// Decode one raw log record
    pub fn from_value(value: &Value) -> Result<Self, EventDecodeError> {
        let record: EventRecord = serde_json::from_value(value.clone())?;
        Self::try_from(record)
    }

    /// Encode back into the producer wire form
    pub fn to_record(&self) -> EventRecord {
        let mut record = EventRecord {
            timestamp: Some(format_timestamp(&self.timestamp)),
            kind: Some(self.kind().as_str().to_string()),
            trace_id: self.trace_id.clone(),
            span_id: self.span_id.clone(),
            ..Default::default()
        };

        match &self.body {
            EventBody::ToolCall { method, payload } => {
                record.tool = Some(self.actor.clone());
                record.method = Some(method.clone());
                record.data = Some(Value::Object(payload.clone()));
            }
            EventBody::Agent(event) => {
                record.agent = Some(self.actor.clone());
                record.event = Some(event.label().to_string());
                let (payload, duration_ms) = match event {
                    AgentEvent::Start { payload }
                    | AgentEvent::Input { payload }
                    | AgentEvent::Other { payload, .. } => (payload.clone(), None),
                    AgentEvent::LlmResponse { response } => {
                        let mut payload = Payload::new();
                        match response {
                            LlmResponse::Text(text) => {
                                payload.insert("response".into(), Value::String(text.clone()));
                            }
                            LlmResponse::Length(len) => {
                                payload.insert("response_length".into(), Value::from(*len));
                            }
                        }
                        (payload, None)
                    }
                    AgentEvent::Complete {
                        output,
                        duration_ms,
                        payload,
                    } => {
                        let mut payload = payload.clone();
                        if let Some(output) = output {
                            payload.insert("output".into(), output.clone());
                        }
                        (payload, *duration_ms)
                    }
                    AgentEvent::Error {
                        duration_ms,
                        payload,
                    } => (payload.clone(), *duration_ms),
                };
                record.data = Some(Value::Object(payload));
                record.duration_ms = duration_ms;
            }
            EventBody::LlmCall {
                model,
                tokens,
                latency_ms,
            } => {
                record.agent = Some(self.actor.clone());
                record.model = Some(model.clone());
                record.tokens = tokens.clone();
                record.latency_ms = *latency_ms;
            }
        }

        record
    }

    /// Encode as a JSON value for the log file
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self.to_record()).unwrap_or(Value::Null)
    }
}

impl TryFrom<EventRecord> for Event {
    type Error = EventDecodeError;

    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        let raw_ts = record
            .timestamp
            .as_deref()
            .ok_or(EventDecodeError::MissingTimestamp)?;
        let timestamp = parse_timestamp(raw_ts)
            .ok_or_else(|| EventDecodeError::BadTimestamp(raw_ts.to_string()))?;

        let kind = match record.kind.as_deref() {
            Some(raw) => EventKind::parse(raw)
                .ok_or_else(|| EventDecodeError::UnknownKind(raw.to_string()))?,
            None if record.agent.is_some() => EventKind::AgentEvent,
            None if record.tool.is_some() => EventKind::ToolCall,
            None => return Err(EventDecodeError::UnclassifiedRecord),
        };

        let payload = match record.data {
            None | Some(Value::Null) => Payload::new(),
            Some(Value::Object(map)) => map,
            Some(_) => return Err(EventDecodeError::PayloadNotObject),
        };

        let (actor, body) = match kind {
            EventKind::ToolCall => {
                let actor = non_empty(record.tool).ok_or(EventDecodeError::MissingActor(kind))?;
                let method = non_empty(record.method).ok_or(EventDecodeError::MissingLabel(kind))?;
                (actor, EventBody::ToolCall { method, payload })
            }
            EventKind::AgentEvent => {
                let actor = non_empty(record.agent).ok_or(EventDecodeError::MissingActor(kind))?;
                let label = non_empty(record.event).ok_or(EventDecodeError::MissingLabel(kind))?;
                let event = decode_agent_event(label, payload, record.duration_ms)?;
                (actor, EventBody::Agent(event))
            }
            EventKind::LlmCall => {
                let actor = non_empty(record.agent).ok_or(EventDecodeError::MissingActor(kind))?;
                let model = non_empty(record.model).ok_or(EventDecodeError::MissingModel)?;
                (
                    actor,
                    EventBody::LlmCall {
                        model,
                        tokens: record.tokens,
                        latency_ms: record.latency_ms,
                    },
                )
            }
        };

        Ok(Event {
            timestamp,
            actor,
            trace_id: record.trace_id,
            span_id: record.span_id,
            body,
        })
    }
}

fn decode_agent_event(
    label: String,
    mut payload: Payload,
    duration_ms: Option<u64>,
) -> Result<AgentEvent, EventDecodeError> {
    let event = match label.as_str() {
        "start" => AgentEvent::Start { payload },
        "input" => AgentEvent::Input { payload },
        "llm_response" => {
            let response = match (payload.get("response"), payload.get("response_length")) {
                (Some(Value::String(text)), _) => LlmResponse::Text(text.clone()),
                (None, Some(len)) => {
                    LlmResponse::Length(len.as_u64().ok_or(EventDecodeError::BadLlmResponse)?)
                }
                _ => return Err(EventDecodeError::BadLlmResponse),
            };
            AgentEvent::LlmResponse { response }
        }
        "complete" => AgentEvent::Complete {
            output: payload.remove("output"),
            duration_ms,
            payload,
        },
        "error" => AgentEvent::Error {
            duration_ms,
            payload,
        },
        _ => AgentEvent::Other { label, payload },
    };
    Ok(event)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
