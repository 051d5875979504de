//! SQLite persistence adapter.
//!
//! Implements [`PersistenceGateway`](crate::port::outbound::gateway::PersistenceGateway)
//! over a Diesel connection pool, with a single-worker job queue for
//! asynchronous statements and write-behind.

pub mod database;
pub mod gateway;
pub mod jobs;

pub use gateway::SqliteGateway;
pub use jobs::JobQueue;
