//! Sharecache - in-memory market data cache for listed equities.
//!
//! The cache holds, per instrument, a static profile, daily historical bars
//! keyed by date and real-time ticks keyed by observation time. It is filled
//! from a SQLite store at startup, kept current by a quote feed and read
//! concurrently by analysis code.
//!
//! # Architecture
//!
//! - **`domain`** - Instrument codes, bars, ticks and the per-instrument aggregate
//! - **`application`** - [`MarketDataEngine`](application::MarketDataEngine), the
//!   only way into the cache, plus the daily real-time rollover
//! - **`port`** - The persistence gateway and subscriber traits
//! - **`adapter`** - SQLite gateway with a job queue, bundled subscribers, the CLI
//! - **`infrastructure`** - TOML configuration and the composition root
//!
//! # Example
//!
//! ```no_run
//! use sharecache::domain::InstrumentCode;
//! use sharecache::infrastructure::bootstrap::start_engine;
//! use sharecache::infrastructure::config::Config;
//!
//! fn main() -> sharecache::error::Result<()> {
//!     let config = Config::load(Config::DEFAULT_PATH)?;
//!     let engine = start_engine(&config)?;
//!     if let Some(tick) = engine.get_current_realtime(&InstrumentCode::new("600000")) {
//!         println!("{} {}", tick.code, tick.price);
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
