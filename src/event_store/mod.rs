//! Event Store Module
//!
//! - `EventStore`: ordered, append-only event log backed by a JSON array file
//! - `TraceRecorder`: producer-side helper that appends correlated events
//! - `StatsCollector`: counts and sizes for the current log snapshot
//!
//! # Architecture
//!
//! ```text
//! Write Path (producers):
//! ┌──────────┐    ┌───────────────┐    ┌──────────────────────┐
//! │ Pipeline │───►│ TraceRecorder │───►│ append: temp + rename│
//! │ stage    │    │ (TraceContext)│    │ message_history.json │
//! └──────────┘    └───────────────┘    └──────────────────────┘
//!
//! Read Path (per query):
//! ┌───────────────┐    ┌─────────────────┐
//! │ read_raw()    │───►│ decode_records  │───► Vec<Event> + malformed count
//! │ empty on error│    │ skip malformed  │
//! └───────────────┘    └─────────────────┘
//! ```

mod recorder;
mod stats;
mod store;

pub use recorder::{generate_id, TraceContext, TraceRecorder};
pub use stats::{LogStats, StatsCollector};
pub use store::{
    decode_records, DecodedLog, EventStore, EventStoreConfig, StoreError, StoreResult,
};
pub(crate) use store::json_type_name;
