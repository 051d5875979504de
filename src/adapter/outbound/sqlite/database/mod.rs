//! SQLite database modules.
//!
//! Provides database connection management, schema definitions, and
//! Diesel model types for SQLite persistence.

pub mod connection;
pub mod model;
pub mod schema;

pub use connection::{configure_sqlite_connection, create_pool, run_migrations, DbPool};
