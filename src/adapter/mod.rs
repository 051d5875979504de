//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - The command-line interface
//! - [`outbound`] - SQLite persistence and the bundled subscribers

pub mod inbound;
pub mod outbound;
