//! Handler for the `inspect` command.

use crate::adapter::inbound::cli::command::InspectArgs;
use crate::adapter::inbound::cli::output;
use crate::domain::InstrumentCode;
use crate::error::{Error, Result};
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

/// Load the cache and print one instrument as JSON.
///
/// With `--date` only that day's bar is printed, or `null` if there is none.
pub fn execute(args: &InspectArgs) -> Result<()> {
    let config = Config::load(&args.config.config)?;
    config.init_command_logging();
    let engine = bootstrap::start_engine(&config)?;
    let code = InstrumentCode::new(args.code.trim());

    let value = match args.date {
        Some(date) => {
            if !engine.contains(&code) {
                return Err(Error::UnknownInstrument(code));
            }
            serde_json::to_value(engine.get_historical_by_date(&code, date))?
        }
        None => {
            let aggregate = engine
                .get_copy(&code)
                .ok_or_else(|| Error::UnknownInstrument(code.clone()))?;
            serde_json::to_value(aggregate)?
        }
    };

    if output::is_json() {
        output::json_output(value);
    } else {
        output::lines(&serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
