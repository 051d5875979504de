//! In-memory caches owned by the engine.

pub mod market;

pub use market::MarketDataCache;
