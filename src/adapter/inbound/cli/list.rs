//! Handler for the `list` command.

use std::path::Path;

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::output;
use crate::domain::InstrumentAggregate;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

#[derive(Tabled)]
struct InstrumentRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Industry")]
    industry: String,
    #[tabled(rename = "Market")]
    market: String,
    #[tabled(rename = "Bars")]
    bars: usize,
    #[tabled(rename = "Ticks")]
    ticks: usize,
    #[tabled(rename = "Last Close")]
    last_close: String,
}

impl From<&InstrumentAggregate> for InstrumentRow {
    fn from(aggregate: &InstrumentAggregate) -> Self {
        let profile = aggregate.profile();
        Self {
            code: profile.code.to_string(),
            name: profile.name.clone(),
            industry: profile.industry.clone(),
            market: profile.market.clone(),
            bars: aggregate.history().len(),
            ticks: aggregate.realtime().len(),
            last_close: aggregate
                .history()
                .latest()
                .map_or_else(|| "-".to_string(), |bar| bar.close.to_string()),
        }
    }
}

/// Load the cache and print every instrument, ordered by code.
pub fn execute<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let config = Config::load(config_path)?;
    config.init_command_logging();
    let engine = bootstrap::start_engine(&config)?;

    let mut instruments: Vec<InstrumentAggregate> = engine.get_all_copy().into_values().collect();
    instruments.sort_by(|a, b| a.code().cmp(b.code()));

    if output::is_json() {
        let rows: Vec<_> = instruments
            .iter()
            .map(|aggregate| {
                json!({
                    "code": aggregate.code(),
                    "name": aggregate.profile().name,
                    "bars": aggregate.history().len(),
                })
            })
            .collect();
        output::json_output(json!(rows));
        return Ok(());
    }

    if instruments.is_empty() {
        output::warning("No instruments in the database");
        return Ok(());
    }

    let rows: Vec<InstrumentRow> = instruments.iter().map(InstrumentRow::from).collect();
    output::lines(&Table::new(rows).to_string());
    Ok(())
}
