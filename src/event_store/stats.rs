//! Event log statistics
//!
//! Counts records by kind, malformed records, and the log's size on disk.

use std::collections::BTreeMap;
use std::fs;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::store::{decode_records, EventStore};

/// Statistics about the event log
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogStats {
    /// Raw records in the log, malformed included
    pub total_records: usize,
    /// Decoded events by kind (`tool_call`, `agent_event`, `llm_call`)
    pub events_by_kind: BTreeMap<String, usize>,
    pub malformed_records: usize,
    /// Distinct trace ids in first-appearance order
    pub trace_ids: Vec<String>,
    pub first_timestamp: Option<DateTime<Utc>>,
    pub last_timestamp: Option<DateTime<Utc>>,
    pub log_size_bytes: u64,
}

impl LogStats {
    /// Format size in human-readable format
    pub fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;

        if bytes >= MB {
            format!("{:.2} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.2} KB", bytes as f64 / KB as f64)
        } else {
            format!("{} B", bytes)
        }
    }
}

/// Collector for event log statistics
pub struct StatsCollector<'a> {
    store: &'a EventStore,
}

impl<'a> StatsCollector<'a> {
    pub fn new(store: &'a EventStore) -> Self {
        Self { store }
    }

    /// Collect statistics from the current log snapshot
    pub fn collect(&self) -> LogStats {
        let records = self.store.read_raw();
        let decoded = decode_records(&records);

        let mut stats = LogStats {
            total_records: records.len(),
            malformed_records: decoded.malformed,
            log_size_bytes: fs::metadata(self.store.config().events_path())
                .map(|m| m.len())
                .unwrap_or(0),
            ..Default::default()
        };

        for event in &decoded.events {
            *stats
                .events_by_kind
                .entry(event.kind().as_str().to_string())
                .or_insert(0) += 1;

            if let Some(trace_id) = &event.trace_id {
                if !stats.trace_ids.contains(trace_id) {
                    stats.trace_ids.push(trace_id.clone());
                }
            }

            stats.first_timestamp = Some(match stats.first_timestamp {
                Some(first) => first.min(event.timestamp),
                None => event.timestamp,
            });
            stats.last_timestamp = Some(match stats.last_timestamp {
                Some(last) => last.max(event.timestamp),
                None => event.timestamp,
            });
        }

        stats
    }
}
