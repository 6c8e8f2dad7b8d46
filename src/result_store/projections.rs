//! Typed projections over well-known result keys
//!
//! Each projection tolerates missing or oddly-typed fields and falls back to
//! a placeholder, since the result object is producer-defined.

use serde::Serialize;
use serde_json::{Map, Value};

fn section<'a>(results: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    results.get(key).and_then(Value::as_object)
}

fn text_or(section: Option<&Map<String, Value>>, field: &str, default: &str) -> String {
    section
        .and_then(|s| s.get(field))
        .and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| default.to_string())
}

fn list(section: Option<&Map<String, Value>>, field: &str) -> Vec<Value> {
    section
        .and_then(|s| s.get(field))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Root-cause analysis summary (key `rca`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub root_cause: String,
    /// `<file>:line <n>`
    pub error_location: String,
    pub error_type: String,
    pub error_message: String,
    pub evidence: Vec<Value>,
}

impl Analysis {
    pub fn from_results(results: &Map<String, Value>) -> Self {
        let rca = section(results, "rca");
        Self {
            root_cause: text_or(rca, "root_cause", "N/A"),
            error_location: format!(
                "{}:line {}",
                text_or(rca, "affected_file", "unknown"),
                text_or(rca, "affected_line", "?")
            ),
            error_type: text_or(rca, "error_type", "Unknown"),
            error_message: text_or(rca, "error_message", ""),
            evidence: list(rca, "evidence"),
        }
    }
}

/// Proposed fix (key `fix_plan`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixPlan {
    pub fix_description: String,
    pub steps: Vec<Value>,
    pub code_change: Value,
    pub safety_checks: Vec<Value>,
    pub risk_level: String,
}

impl FixPlan {
    pub fn from_results(results: &Map<String, Value>) -> Self {
        let fix = section(results, "fix_plan");
        Self {
            fix_description: text_or(fix, "strategy", "N/A"),
            steps: list(fix, "steps"),
            code_change: fix
                .and_then(|f| f.get("code_change"))
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new())),
            safety_checks: list(fix, "safety_checks"),
            risk_level: text_or(fix, "risk_level", "unknown"),
        }
    }
}

/// Artifacts named by the results, used to resolve default diff inputs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchInfo {
    /// `rca.affected_file`, relative to the codebase directory
    pub affected_file: Option<String>,
    /// `patch.fixed_file`, relative to the artifact root
    pub fixed_file: Option<String>,
    /// `patch.status`
    pub status: Option<String>,
}

impl PatchInfo {
    pub fn from_results(results: &Map<String, Value>) -> Self {
        let field = |key: &str, name: &str| {
            section(results, key)
                .and_then(|s| s.get(name))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            affected_file: field("rca", "affected_file"),
            fixed_file: field("patch", "fixed_file"),
            status: field("patch", "status"),
        }
    }
}
