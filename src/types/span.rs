//! Reconstructed spans and their child calls

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::event::{Payload, TokenUsage};

/// Lifecycle status of a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanStatus {
    /// Opened, no terminal event seen yet
    Running,
    Success,
    Error,
}

/// A tool call attributed to a span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool: String,
    pub method: String,
    pub payload: Payload,
    pub timestamp: DateTime<Utc>,
}

/// An LLM call attributed to a span
///
/// Built either from an `llm_response` lifecycle event (preview/length set)
/// or from an `llm_call` accounting event (model/tokens/latency set).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmInvocation {
    pub model: Option<String>,
    pub tokens: Option<TokenUsage>,
    pub latency_ms: Option<u64>,
    pub response_preview: Option<String>,
    pub response_length: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

/// A nested call inside a span, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChildCall {
    Tool(ToolInvocation),
    Llm(LlmInvocation),
}

impl ChildCall {
    pub fn timestamp(&self) -> &DateTime<Utc> {
        match self {
            ChildCall::Tool(call) => &call.timestamp,
            ChildCall::Llm(call) => &call.timestamp,
        }
    }

    pub fn is_tool(&self) -> bool {
        matches!(self, ChildCall::Tool(_))
    }

    pub fn is_llm(&self) -> bool {
        matches!(self, ChildCall::Llm(_))
    }
}

/// One reconstructed lifecycle unit
///
/// `status == Running` exactly when `end_time` is `None`, and
/// `end_time >= start_time` whenever it is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub span_id: String,
    pub actor: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_ms: Option<u64>,
    pub status: SpanStatus,
    pub children: Vec<ChildCall>,
    pub input: Option<Value>,
    pub output: Option<Value>,
}

impl Span {
    /// Open a new running span
    pub fn open(span_id: String, actor: String, start_time: DateTime<Utc>) -> Self {
        Self {
            span_id,
            actor,
            start_time,
            end_time: None,
            duration_ms: None,
            status: SpanStatus::Running,
            children: Vec::new(),
            input: None,
            output: None,
        }
    }

    pub fn tool_call_count(&self) -> usize {
        self.children.iter().filter(|c| c.is_tool()).count()
    }

    pub fn llm_call_count(&self) -> usize {
        self.children.iter().filter(|c| c.is_llm()).count()
    }
}
