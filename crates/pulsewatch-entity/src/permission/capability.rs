//! Dashboard capabilities gated by role.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single dashboard capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Create and edit monitored services.
    #[serde(rename = "canManageServices")]
    ManageServices,
    /// Manage alert email recipients.
    #[serde(rename = "canManageEmails")]
    ManageEmails,
    /// Manage other users and their roles.
    #[serde(rename = "canManageUsers")]
    ManageUsers,
    /// View health-check history.
    #[serde(rename = "canViewHealthChecks")]
    ViewHealthChecks,
    /// Delete monitored services.
    #[serde(rename = "canDeleteServices")]
    DeleteServices,
    /// View the main dashboard.
    #[serde(rename = "canViewDashboard")]
    ViewDashboard,
    /// View uptime analytics.
    #[serde(rename = "canViewAnalytics")]
    ViewAnalytics,
    /// Change dashboard settings.
    #[serde(rename = "canManageSettings")]
    ManageSettings,
    /// Enter the super-admin area.
    #[serde(rename = "canAccessSuperAdmin")]
    AccessSuperAdmin,
}

impl Capability {
    /// Every capability, in table order.
    pub const ALL: [Capability; 9] = [
        Capability::ManageServices,
        Capability::ManageEmails,
        Capability::ManageUsers,
        Capability::ViewHealthChecks,
        Capability::DeleteServices,
        Capability::ViewDashboard,
        Capability::ViewAnalytics,
        Capability::ManageSettings,
        Capability::AccessSuperAdmin,
    ];

    /// The capability's wire name, e.g. `canManageUsers`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManageServices => "canManageServices",
            Self::ManageEmails => "canManageEmails",
            Self::ManageUsers => "canManageUsers",
            Self::ViewHealthChecks => "canViewHealthChecks",
            Self::DeleteServices => "canDeleteServices",
            Self::ViewDashboard => "canViewDashboard",
            Self::ViewAnalytics => "canViewAnalytics",
            Self::ManageSettings => "canManageSettings",
            Self::AccessSuperAdmin => "canAccessSuperAdmin",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Capability {
    type Err = pulsewatch_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|cap| cap.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                pulsewatch_core::AppError::validation(format!("Unknown capability: '{s}'"))
            })
    }
}
