//! Uptime analytics summaries.

use serde::{Deserialize, Serialize};

/// Aggregate uptime numbers across all monitored services.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsSummary {
    /// Number of monitored services.
    pub total_services: u32,
    /// Services whose last probe was up.
    pub services_up: u32,
    /// Services whose last probe was down.
    pub services_down: u32,
    /// Mean uptime percentage over the reporting window.
    pub uptime_percent: f64,
    /// Mean response time in milliseconds.
    pub average_response_ms: f64,
}
