//! Cache behaviour and rollover configuration.

use chrono::NaiveTime;
use serde::Deserialize;

/// In-memory cache behaviour.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
    /// Persist accepted ticks and merged bars through the job queue.
    #[serde(default)]
    pub write_behind: bool,
}

/// Daily clearing of real-time stores.
#[derive(Debug, Clone, Deserialize)]
pub struct RolloverConfig {
    #[serde(default = "default_rollover_enabled")]
    pub enabled: bool,
    /// Local wall-clock time at which real-time data is cleared.
    #[serde(default = "default_rollover_at")]
    pub at: NaiveTime,
}

fn default_rollover_enabled() -> bool {
    true
}

fn default_rollover_at() -> NaiveTime {
    NaiveTime::from_hms_opt(15, 30, 0).unwrap_or(NaiveTime::MIN)
}

impl Default for RolloverConfig {
    fn default() -> Self {
        Self {
            enabled: default_rollover_enabled(),
            at: default_rollover_at(),
        }
    }
}
