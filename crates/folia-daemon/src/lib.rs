//! folia service wiring
//!
//! Starts the HTTP server right away and rebuilds the snapshot in the
//! background. Until the first rebuild publishes, every query endpoint
//! answers 503.

#![warn(clippy::all)]

use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use folia_config::FoliaConfig;
use folia_core::SnapshotStore;
use folia_pipeline::{spawn_rebuild_loop, JsonDirSource, SnapshotPipeline};
use folia_web::{start_server, AppState};

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Serve until `shutdown` resolves, rebuilding in the background.
pub async fn run<F>(config: FoliaConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let store = Arc::new(SnapshotStore::new());
    let source = Arc::new(JsonDirSource::from_config(&config.source));
    info!(
        database = %config.source.database,
        dir = %source.dir().display(),
        "Using JSON directory source"
    );

    let pipeline = Arc::new(SnapshotPipeline::new(source, Arc::clone(&store)));
    let rebuilds = spawn_rebuild_loop(pipeline, config.rebuild.interval());

    let state = AppState::new(store, config.http.images_dir.clone()).with_database(&config.source.database);
    let served = start_server(&config.http, state, shutdown)
        .await
        .with_context(|| format!("HTTP server on {} failed", config.http_addr()));

    rebuilds.abort();
    served
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_stops_on_shutdown() {
        let data = tempfile::tempdir().expect("tempdir");
        let mut config = FoliaConfig::default();
        config.http.port = 0;
        config.source.data_dir = data.path().to_path_buf();

        run(config, async {}).await.expect("clean shutdown");
    }

    #[tokio::test]
    async fn bad_bind_address_is_reported() {
        let mut config = FoliaConfig::default();
        config.http.bind_address = "not an address".into();

        let err = run(config, async {}).await.unwrap_err();
        assert!(format!("{err:#}").contains("Invalid address"));
    }
}
