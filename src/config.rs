//! Server configuration from environment variables

use std::env;
use std::path::PathBuf;

use crate::diff::DEFAULT_CONTEXT;
use crate::event_store::EventStoreConfig;

/// Runtime configuration for the query server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub store: EventStoreConfig,
    /// Root for modified artifacts (`patch.fixed_file`)
    pub artifact_root: PathBuf,
    /// Root for original artifacts (`rca.affected_file`)
    pub codebase_dir: PathBuf,
    /// Unchanged lines kept around each diff change
    pub diff_context: usize,
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            store: EventStoreConfig::default(),
            artifact_root: PathBuf::from("."),
            codebase_dir: PathBuf::from("codebase"),
            diff_context: DEFAULT_CONTEXT,
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Read `TRACE_LENS_*` variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("TRACE_LENS_DATA_DIR") {
            config.store.data_dir = PathBuf::from(dir);
        }
        if let Some(file) = lookup("TRACE_LENS_EVENTS_FILE") {
            config.store.events_file = file;
        }
        if let Some(file) = lookup("TRACE_LENS_RESULTS_FILE") {
            config.store.results_file = file;
        }
        if let Some(root) = lookup("TRACE_LENS_ARTIFACT_ROOT") {
            config.artifact_root = PathBuf::from(root);
        }
        if let Some(dir) = lookup("TRACE_LENS_CODEBASE_DIR") {
            config.codebase_dir = PathBuf::from(dir);
        }
        if let Some(host) = lookup("TRACE_LENS_HOST") {
            config.host = host;
        }
        config.diff_context = parse_or(&lookup, "TRACE_LENS_DIFF_CONTEXT", config.diff_context);
        config.port = parse_or(&lookup, "TRACE_LENS_PORT", config.port);

        config
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default = %default, "invalid value, using default");
            default
        }),
        None => default,
    }
}
