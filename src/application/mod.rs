//! Application services.
//!
//! The engine owns the cache and is the only way callers reach it. The
//! rollover task drives the engine on a daily schedule.

pub mod cache;
pub mod engine;
pub mod rollover;

pub use engine::MarketDataEngine;
pub use rollover::{next_rollover, spawn_rollover};
