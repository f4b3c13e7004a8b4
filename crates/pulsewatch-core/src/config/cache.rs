//! Response cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Response cache and sweeper settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL applied when a caller does not pass one, in seconds.
    #[serde(default = "default_ttl")]
    pub default_ttl_seconds: u64,
    /// Interval between full expiry sweeps, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl CacheConfig {
    /// Default entry TTL as a [`Duration`].
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }

    /// Sweep interval as a [`Duration`].
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_seconds: default_ttl(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

fn default_ttl() -> u64 {
    300
}

fn default_sweep_interval() -> u64 {
    600
}
