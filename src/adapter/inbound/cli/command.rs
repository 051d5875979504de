//! Command-line interface definitions.
//!
//! Defines the CLI structure for the sharecache binary using `clap`.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::infrastructure::config::settings::Config;

/// In-memory market data cache backed by SQLite
#[derive(Parser, Debug)]
#[command(name = "sharecache")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the cache and keep it warm until interrupted
    Run(ConfigPathArg),

    /// Validate configuration and database connectivity
    Check(ConfigPathArg),

    /// List cached instruments
    List(ConfigPathArg),

    /// Show one instrument's profile and data
    Inspect(InspectArgs),
}

/// Shared argument struct for commands that require only a configuration path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value = Config::DEFAULT_PATH)]
    pub config: PathBuf,
}

/// Arguments for the `inspect` subcommand.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Instrument code, e.g. 600000.
    pub code: String,

    /// Only show the bar for this date (YYYY-MM-DD).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[command(flatten)]
    pub config: ConfigPathArg,
}
