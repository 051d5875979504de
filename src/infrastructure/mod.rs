//! Infrastructure layer.
//!
//! Configuration loading and the composition root. No market data logic
//! lives here.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Builds the SQLite-backed engine from configuration
//! - [`config`] - Configuration loading and validation

pub mod bootstrap;
pub mod config;
