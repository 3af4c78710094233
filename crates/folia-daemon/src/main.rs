// folia - snapshot and query service for the bibliographic knowledge graph
//
// Loads configuration, starts the HTTP interface and keeps the in-memory
// snapshot rebuilt from the exported collections.

use folia_config::ConfigLoader;
use std::process;
use tracing::{error, info};

/// Exit codes for different scenarios
mod exit_codes {
    pub const CONFIG_ERROR: i32 = 1;
    pub const SERVER_ERROR: i32 = 2;
}

#[tokio::main]
async fn main() {
    let mut loader = ConfigLoader::new();
    if let Some(path) = std::env::args_os().nth(1) {
        loader = loader.with_path(path);
    }

    let config = match loader.load() {
        Ok(config) => config,
        Err(e) => {
            folia_daemon::init_logging("info");
            error!("Failed to load configuration: {}", e);
            process::exit(exit_codes::CONFIG_ERROR);
        }
    };
    folia_daemon::init_logging(&config.logging.level);

    info!("Starting folia v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = folia_daemon::run(config, shutdown_signal()).await {
        error!("{:#}", e);
        process::exit(exit_codes::SERVER_ERROR);
    }
    info!("Shutdown complete");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
