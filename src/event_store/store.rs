//! Event Store - ordered, append-only pipeline event log
//!
//! The log is a single JSON array of event records. Appends rewrite the
//! whole array through [`atomic_write_with`], so a reader never observes a
//! half-written record. Reads never fail: a missing or corrupt log reads as
//! empty, which makes the store safe to poll before any producer has run.

use std::fs;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::Value;
use thiserror::Error;

use crate::types::Event;
use crate::utils::{atomic_write_with, AtomicError};

/// Configuration for the EventStore
#[derive(Debug, Clone)]
pub struct EventStoreConfig {
    /// Directory holding the event log and result store
    pub data_dir: PathBuf,
    /// Event log file name, relative to `data_dir`
    pub events_file: String,
    /// Result store file name, relative to `data_dir`
    pub results_file: String,
}

impl Default for EventStoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("memory"),
            events_file: "message_history.json".to_string(),
            results_file: "shared_memory.json".to_string(),
        }
    }
}

impl EventStoreConfig {
    /// Create config with custom data directory
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path to the event log
    pub fn events_path(&self) -> PathBuf {
        self.data_dir.join(&self.events_file)
    }

    /// Path to the result store
    pub fn results_path(&self) -> PathBuf {
        self.data_dir.join(&self.results_file)
    }
}

/// Result type for EventStore operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("atomic write failed: {0}")]
    Atomic(#[from] AtomicError),
    #[error("store corrupted: {0}")]
    Corrupted(String),
}

/// Events decoded from the log, with the count of rejected records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedLog {
    pub events: Vec<Event>,
    pub malformed: usize,
}

/// Decode raw records, skipping those that fail their variant's schema
pub fn decode_records(records: &[Value]) -> DecodedLog {
    let mut decoded = DecodedLog::default();

    for (index, record) in records.iter().enumerate() {
        match Event::from_value(record) {
            Ok(event) => decoded.events.push(event),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed event record");
                decoded.malformed += 1;
            }
        }
    }

    decoded
}

/// The EventStore owns the on-disk event log
pub struct EventStore {
    config: EventStoreConfig,
    /// Serializes read-modify-write appends within this process
    write_lock: Mutex<()>,
}

impl EventStore {
    /// Create a new EventStore with default config
    pub fn new() -> Self {
        Self::with_config(EventStoreConfig::default())
    }

    /// Create a new EventStore with custom config
    pub fn with_config(config: EventStoreConfig) -> Self {
        Self {
            config,
            write_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &EventStoreConfig {
        &self.config
    }

    /// Append one event, preserving insertion order
    pub fn append(&self, event: &Event) -> StoreResult<()> {
        self.append_record(event.to_value())
    }

    /// Append one raw record
    ///
    /// Fails with [`StoreError::Corrupted`] or `Json` when the existing log
    /// cannot be parsed; the file is left untouched.
    pub fn append_record(&self, record: Value) -> StoreResult<()> {
        let _guard = self.write_lock.lock();
        let path = self.config.events_path();

        let mut records = match load_array(&path)? {
            Some(records) => records,
            None => Vec::new(),
        };
        records.push(record);

        atomic_write_with(&path, |file| {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &records).map_err(io::Error::from)?;
            io::Write::flush(&mut writer)
        })?;

        tracing::debug!(total = records.len(), "appended event record");
        Ok(())
    }

    /// Raw records exactly as stored; empty when the log is missing or corrupt
    pub fn read_raw(&self) -> Vec<Value> {
        let path = self.config.events_path();
        match load_array(&path) {
            Ok(Some(records)) => records,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "event log unavailable, reading as empty"
                );
                Vec::new()
            }
        }
    }

    /// Every decodable event in log order
    pub fn read_all(&self) -> DecodedLog {
        decode_records(&self.read_raw())
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a JSON array file; `Ok(None)` when the file does not exist
fn load_array(path: &Path) -> StoreResult<Option<Vec<Value>>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if content.trim().is_empty() {
        return Ok(Some(Vec::new()));
    }

    match serde_json::from_str::<Value>(&content)? {
        Value::Array(records) => Ok(Some(records)),
        other => Err(StoreError::Corrupted(format!(
            "expected a JSON array, found {}",
            json_type_name(&other)
        ))),
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgentEvent, Payload};
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_store() -> (EventStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = EventStoreConfig::new(temp_dir.path());
        (EventStore::with_config(config), temp_dir)
    }

    #[test]
    fn test_append_and_read_in_order() {
        let (store, _temp_dir) = create_test_store();

        store
            .append(&Event::agent("RCA Agent", AgentEvent::Start { payload: Payload::new() }))
            .unwrap();
        store
            .append(&Event::tool_call("FileReader", "read_file", Payload::new()))
            .unwrap();

        let log = store.read_all();
        assert_eq!(log.malformed, 0);
        assert_eq!(log.events.len(), 2);
        assert_eq!(log.events[0].label(), "start");
        assert_eq!(log.events[1].label(), "read_file");
    }

    #[test]
    fn test_missing_log_reads_empty() {
        let (store, _temp_dir) = create_test_store();
        assert!(store.read_raw().is_empty());
        assert_eq!(store.read_all(), DecodedLog::default());
    }

    #[test]
    fn test_corrupt_log_reads_empty() {
        let (store, _temp_dir) = create_test_store();
        fs::write(store.config().events_path(), "[{\"timestamp\": ").unwrap();
        assert!(store.read_raw().is_empty());

        fs::write(store.config().events_path(), "{\"not\": \"an array\"}").unwrap();
        assert!(store.read_raw().is_empty());
    }

    #[test]
    fn test_append_refuses_to_clobber_corrupt_log() {
        let (store, _temp_dir) = create_test_store();
        fs::write(store.config().events_path(), "garbage").unwrap();

        let result = store.append_record(json!({"type": "tool_call"}));
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(store.config().events_path()).unwrap(), "garbage");
    }

    #[test]
    fn test_malformed_records_are_counted_not_fatal() {
        let (store, _temp_dir) = create_test_store();
        store.append_record(json!({"type": "tool_call"})).unwrap();
        store
            .append(&Event::tool_call("CodeSearch", "search_in_file", Payload::new()))
            .unwrap();
        store.append_record(json!(17)).unwrap();

        assert_eq!(store.read_raw().len(), 3);
        let log = store.read_all();
        assert_eq!(log.events.len(), 1);
        assert_eq!(log.malformed, 2);
    }

    #[test]
    fn test_raw_records_pass_through_unmodified() {
        let (store, _temp_dir) = create_test_store();
        let record = json!({"type": "custom", "extra": {"nested": [1, 2, 3]}});
        store.append_record(record.clone()).unwrap();
        assert_eq!(store.read_raw(), vec![record]);
    }
}
