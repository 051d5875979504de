//! Market data domain types.
//!
//! - [`InstrumentCode`] - cache key
//! - [`HistoricalBar`] / [`HistoricalRecordStore`] - daily bars keyed by date
//! - [`RealTimeTick`] / [`RealTimeRecordStore`] - quotes keyed by observation time
//! - [`InstrumentAggregate`] - profile plus both stores, the unit of storage

pub mod bar;
pub mod error;
pub mod event;
pub mod history;
pub mod id;
pub mod instrument;
pub mod money;
pub mod profile;
pub mod realtime;
pub mod tick;

pub use bar::HistoricalBar;
pub use error::DomainError;
pub use event::MarketEvent;
pub use history::HistoricalRecordStore;
pub use id::InstrumentCode;
pub use instrument::InstrumentAggregate;
pub use money::{Amount, Price, Volume};
pub use profile::InstrumentProfile;
pub use realtime::RealTimeRecordStore;
pub use tick::RealTimeTick;
