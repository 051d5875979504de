//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for profiles, bars, ticks and fixed timestamps.
//! - [`gateway`] - [`MemoryGateway`](gateway::MemoryGateway), an in-memory
//!   [`PersistenceGateway`](crate::port::outbound::gateway::PersistenceGateway).
//! - [`config`] - Canonical test configurations.

pub mod config;
pub mod domain;
pub mod gateway;
