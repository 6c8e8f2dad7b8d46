//! Trace Lens query server - Binary Entry Point

use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use trace_lens::api::{create_router, AppState};
use trace_lens::event_store::{LogStats, StatsCollector};
use trace_lens::utils::cleanup_temp_files;
use trace_lens::ServerConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("trace_lens=info".parse()?))
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(
        data_dir = %config.store.data_dir().display(),
        codebase = %config.codebase_dir.display(),
        artifacts = %config.artifact_root.display(),
        "starting {} v{}",
        trace_lens::NAME,
        trace_lens::VERSION
    );

    // Leftovers from writes interrupted by a crash
    match cleanup_temp_files(config.store.data_dir()) {
        Ok(0) => {}
        Ok(removed) => tracing::info!(removed, "removed stale temp files"),
        Err(e) => tracing::warn!(error = %e, "temp file cleanup failed"),
    }

    let state = Arc::new(AppState::from_config(&config));
    let stats = StatsCollector::new(&state.events).collect();
    tracing::info!(
        records = stats.total_records,
        malformed = stats.malformed_records,
        size = %LogStats::format_size(stats.log_size_bytes),
        "event log opened"
    );

    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
