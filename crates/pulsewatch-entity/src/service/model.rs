//! Monitored service entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::health::HealthStatus;

/// A remote service whose health the dashboard tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoredService {
    /// Server-side identifier.
    #[serde(alias = "_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL that is probed.
    pub url: String,
    /// Probe interval in seconds.
    #[serde(default)]
    pub interval_seconds: u32,
    /// Most recent probe outcome.
    #[serde(default)]
    pub status: HealthStatus,
    /// Whether probing is paused.
    #[serde(default)]
    pub paused: bool,
    /// When the service was registered.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Create/update payload for a monitored service.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInput {
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: String,
    /// URL to probe.
    #[validate(url(message = "must be a valid URL"))]
    pub url: String,
    /// Probe interval in seconds.
    #[validate(range(min = 30, max = 86400, message = "must be between 30 and 86400 seconds"))]
    pub interval_seconds: u32,
}

impl ServiceInput {
    /// Build an input with trimmed text fields.
    pub fn new(name: &str, url: &str, interval_seconds: u32) -> Self {
        Self {
            name: name.trim().to_string(),
            url: url.trim().to_string(),
            interval_seconds,
        }
    }
}
