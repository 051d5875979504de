//! Composition root: wires configuration, the SQLite gateway and the engine.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::sqlite::gateway::SqliteGateway;
use crate::application::engine::MarketDataEngine;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Engine backed by SQLite, as assembled for the binary.
pub type Engine = MarketDataEngine<SqliteGateway>;

/// Connect to the configured store and build an engine without loading it.
///
/// # Errors
/// Returns an error if the database cannot be opened or migrated.
pub fn build_engine(config: &Config) -> Result<Arc<Engine>> {
    let gateway = SqliteGateway::connect(&config.database, &config.jobs)?;
    let engine = MarketDataEngine::new(Arc::new(gateway)).with_write_behind(config.cache.write_behind);
    Ok(Arc::new(engine))
}

/// Build an engine and load every instrument from the store.
///
/// # Errors
/// Returns an error if the store cannot be opened or the load fails.
pub fn start_engine(config: &Config) -> Result<Arc<Engine>> {
    let engine = build_engine(config)?;
    let loaded = engine.load_all()?;
    info!(
        instruments = loaded,
        write_behind = config.cache.write_behind,
        "Market data engine ready"
    );
    Ok(engine)
}
