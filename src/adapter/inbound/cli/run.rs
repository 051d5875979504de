//! Handler for the `run` command.

use std::path::Path;
use std::sync::Arc;

use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::subscriber::LogSubscriber;
use crate::application::rollover::spawn_rollover;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::subscriber::Subscriber;

/// Load the cache and keep it warm until ctrl-c.
///
/// Real-time stores are cleared daily when rollover is enabled. Queued
/// write-behind jobs are drained before returning.
pub async fn execute<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let config = Config::load(config_path)?;
    config.init_logging();
    info!("sharecache starting");

    let engine = bootstrap::start_engine(&config)?;

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Database", &config.database.url);
    output::field("Instruments", engine.len());
    output::field("Write-behind", config.cache.write_behind);

    let log_subscriber: Arc<dyn Subscriber> = Arc::new(LogSubscriber);
    engine.attach_subscriber(&log_subscriber);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let rollover = config.rollover.enabled.then(|| {
        output::field("Rollover", config.rollover.at);
        spawn_rollover(Arc::clone(&engine), config.rollover.at, shutdown_rx)
    });

    output::success("Cache loaded, press ctrl-c to stop");

    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");

    let _ = shutdown_tx.send(true);
    if let Some(handle) = rollover {
        if let Err(e) = handle.await {
            error!(error = %e, "Rollover task failed");
        }
    }
    engine.gateway().shutdown();

    info!("sharecache stopped");
    Ok(())
}
