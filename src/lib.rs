//! Trace Lens
//!
//! Rebuilds hierarchical spans from the flat event log written by a
//! multi-stage agent pipeline, and renders line diffs between original
//! and fixed artifacts. Both views are served over a small read-only
//! HTTP API.
//!
//! # Modules
//!
//! - `types`: Events, spans, summaries and diff lines
//! - `event_store`: Append-only JSON event log, recorder and stats
//! - `result_store`: Shared result mapping and its projections
//! - `trace`: Span reconstruction and summary aggregation
//! - `diff`: Myers line diff grouped into unified hunks
//! - `artifacts`: Text artifact lookup under a root directory
//! - `config`: Environment-driven server configuration
//! - `api`: Axum router and handlers
//! - `utils`: Atomic file writes and timestamps
//!
//! # Example
//!
//! ```no_run
//! use trace_lens::event_store::EventStore;
//! use trace_lens::trace::build_trace;
//!
//! let store = EventStore::new();
//! let trace = build_trace(&store.read_all(), None);
//! println!("{} spans", trace.spans.len());
//! ```

pub mod api;
pub mod artifacts;
pub mod config;
pub mod diff;
pub mod event_store;
pub mod result_store;
pub mod trace;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::ServerConfig;
pub use diff::{diff_texts, diff_texts_with_context};
pub use event_store::{EventStore, EventStoreConfig, TraceRecorder};
pub use result_store::ResultStore;
pub use trace::{build_trace, reconstruct, summarize};
pub use types::{
    ChildCall, DiffLine, DiffLineKind, DiffResult, Event, Span, SpanStatus, Summary, Trace,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
