//! Health-check records for monitored services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a single probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// The service answered successfully.
    Up,
    /// The service failed the probe.
    Down,
    /// The service answered slowly or partially.
    Degraded,
    /// Not probed yet, or the server sent a status this client does not know.
    #[default]
    #[serde(other)]
    Unknown,
}

/// One probe result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    /// Identifier of the probed service.
    pub service_id: String,
    /// Probe outcome.
    pub status: HealthStatus,
    /// Round-trip time in milliseconds, if the probe got an answer.
    #[serde(default)]
    pub response_time_ms: Option<u64>,
    /// HTTP status returned by the probed service.
    #[serde(default)]
    pub status_code: Option<u16>,
    /// When the probe ran.
    pub checked_at: DateTime<Utc>,
}
