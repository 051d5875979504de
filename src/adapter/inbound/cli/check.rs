//! Handler for the `check` command.

use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

/// Validate the configuration file and open the database.
///
/// Opening the database also applies pending migrations, so a passing check
/// leaves the store ready for `run`.
pub fn execute<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    let config = Config::load(path)?;
    config.init_command_logging();

    output::section("Configuration Check");
    output::field("Config", path.display());
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field("Database", &config.database.url);
    output::field("Pool size", config.database.pool_size);
    output::field("Queue", config.jobs.queue_capacity);
    output::field("Write-behind", config.cache.write_behind);
    if config.rollover.enabled {
        output::field("Rollover", config.rollover.at);
    } else {
        output::field("Rollover", "disabled");
    }

    let engine = bootstrap::build_engine(&config)?;
    output::success("Database reachable and migrated");

    let loaded = engine.load_all()?;
    output::field("Instruments", loaded);
    if loaded == 0 {
        output::warning("No instruments in the database");
    }

    output::success("Check complete");
    Ok(())
}
