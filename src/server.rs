use crate::config::Config;
use crate::core_network::network;
use anyhow::{Context, Result};
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;

/// Runs the FTP server with the provided configuration.
///
/// Creates the storage root when it is missing, binds the control listener
/// and serves until the process receives Ctrl-C. Every failure before the
/// first accept is fatal.
///
/// # Arguments
///
/// * `config` - The server configuration, CLI overrides already applied.
///
/// # Returns
///
/// Result<(), anyhow::Error> indicating the success or failure of the operation.
pub async fn run(config: Config) -> Result<()> {
    info!("Starting server with config: {:?}", config);

    let storage_root = prepare_storage_root(&config.server.chroot_dir)?;
    info!("Storage root: {:?}", storage_root);

    let listener = match network::bind(&config.server).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to start server: {:#}", e);
            return Err(e);
        }
    };

    tokio::select! {
        res = network::serve(listener, Arc::new(config), Arc::new(storage_root)) => res,
        _ = signal::ctrl_c() => {
            info!("Shutdown requested, closing all sessions.");
            Ok(())
        }
    }
}

/// Creates the storage root if needed and returns its canonical path.
pub fn prepare_storage_root(dir: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create storage root: {}", dir))?;
    PathBuf::from(dir)
        .canonicalize()
        .with_context(|| format!("Failed to resolve storage root: {}", dir))
}
