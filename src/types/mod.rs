//! Data types for the trace and diff engine
//!
//! Events are read from the log; everything else here is derived per query
//! and owns no external resources.

mod diff;
mod event;
mod span;
mod summary;

pub use diff::{ChangeCounts, DiffLine, DiffLineKind, DiffResult, Hunk};
pub use event::{
    AgentEvent, Event, EventBody, EventDecodeError, EventKind, EventRecord, LlmResponse, Payload,
    TokenUsage,
};
pub use span::{ChildCall, LlmInvocation, Span, SpanStatus, ToolInvocation};
pub use summary::{Diagnostics, Summary, Trace};
