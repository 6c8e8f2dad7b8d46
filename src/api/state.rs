//! Shared application state for HTTP handlers
//!
//! Holds only handles to external stores. Every query re-reads a snapshot
//! and rebuilds its derived view, so no derived data is shared between
//! requests.

use std::sync::Arc;

use crate::artifacts::{ArtifactSource, FsArtifacts};
use crate::config::ServerConfig;
use crate::event_store::EventStore;
use crate::result_store::ResultStore;

pub struct AppState {
    pub events: Arc<EventStore>,
    pub results: ResultStore,
    /// Source of original (pre-fix) artifacts
    pub originals: Arc<dyn ArtifactSource>,
    /// Source of modified (fixed) artifacts
    pub modified: Arc<dyn ArtifactSource>,
    pub diff_context: usize,
}

impl AppState {
    pub fn new(
        events: Arc<EventStore>,
        results: ResultStore,
        originals: Arc<dyn ArtifactSource>,
        modified: Arc<dyn ArtifactSource>,
        diff_context: usize,
    ) -> Self {
        Self {
            events,
            results,
            originals,
            modified,
            diff_context,
        }
    }

    /// Wire file-backed stores from configuration
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            Arc::new(EventStore::with_config(config.store.clone())),
            ResultStore::new(config.store.results_path()),
            Arc::new(FsArtifacts::new(&config.codebase_dir)),
            Arc::new(FsArtifacts::new(&config.artifact_root)),
            config.diff_context,
        )
    }
}
