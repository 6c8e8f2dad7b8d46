//! Result Store - read-only view of the producers' shared result object
//!
//! Producers write a single JSON object whose top-level keys (`rca`,
//! `fix_plan`, `patch`, ...) are theirs to define. The engine only reads it;
//! a missing, corrupt or non-object file reads as an empty map.

mod projections;

pub use projections::{Analysis, FixPlan, PatchInfo};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::event_store::{json_type_name, StoreError, StoreResult};

/// Read-only access to the result store file
#[derive(Debug, Clone)]
pub struct ResultStore {
    path: PathBuf,
}

impl ResultStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current top-level mapping, passed through unmodified
    pub fn read_all(&self) -> Map<String, Value> {
        match self.load() {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "result store unavailable, reading as empty"
                );
                Map::new()
            }
        }
    }

    pub fn analysis(&self) -> Analysis {
        Analysis::from_results(&self.read_all())
    }

    pub fn fix_plan(&self) -> FixPlan {
        FixPlan::from_results(&self.read_all())
    }

    pub fn patch_info(&self) -> PatchInfo {
        PatchInfo::from_results(&self.read_all())
    }

    fn load(&self) -> StoreResult<Map<String, Value>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::Corrupted(format!(
                "expected a JSON object, found {}",
                json_type_name(&other)
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    // Test-only lookup helper used by the assertions below
    impl ResultStore {
        fn get(&self, key: &str) -> Option<Value> {
            self.read_all().get(key).cloned()
        }
    }

    #[test]
    fn test_missing_store_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = ResultStore::new(temp_dir.path().join("shared_memory.json"));
        assert!(store.read_all().is_empty());
        assert!(store.get("rca").is_none());
    }

    #[test]
    fn test_corrupt_or_non_object_store_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shared_memory.json");
        let store = ResultStore::new(&path);

        fs::write(&path, "{\"rca\": ").unwrap();
        assert!(store.read_all().is_empty());

        fs::write(&path, "[1, 2]").unwrap();
        assert!(store.read_all().is_empty());
    }

    #[test]
    fn test_values_pass_through() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shared_memory.json");
        let content = json!({"rca": {"root_cause": "off by one"}, "custom": [1, {"x": null}]});
        fs::write(&path, content.to_string()).unwrap();

        let store = ResultStore::new(&path);
        assert_eq!(Value::Object(store.read_all()), content);
        assert_eq!(store.get("custom"), Some(json!([1, {"x": null}])));
    }
}
