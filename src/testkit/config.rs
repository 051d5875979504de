//! Canonical test configurations.

use crate::infrastructure::config::database::{DatabaseConfig, JobsConfig};

/// Single-connection settings with a short busy timeout.
pub fn database(url: &str) -> DatabaseConfig {
    DatabaseConfig {
        url: url.to_string(),
        pool_size: 1,
        busy_timeout_ms: 1000,
    }
}

/// Job queue small enough to fill in a test.
pub fn jobs(queue_capacity: usize) -> JobsConfig {
    JobsConfig { queue_capacity }
}

/// Minimal TOML document pointing at `url`.
pub fn toml(url: &str) -> String {
    format!("[database]\nurl = \"{url}\"\n")
}
