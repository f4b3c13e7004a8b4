//! Dashboard-wide settings.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Settings editable by admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSettings {
    /// Default probe interval for new services, in seconds.
    #[validate(range(min = 30, max = 86400, message = "must be between 30 and 86400 seconds"))]
    pub default_interval_seconds: u32,
    /// Consecutive failures before an alert email is sent.
    #[validate(range(min = 1, max = 20, message = "must be between 1 and 20"))]
    pub alert_threshold: u32,
    /// Whether alert emails are sent at all.
    pub alerts_enabled: bool,
}
