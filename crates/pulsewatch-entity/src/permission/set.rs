//! The fixed record of capabilities granted to a role.

use serde::{Deserialize, Serialize};

use super::capability::Capability;

/// Nine boolean capabilities. A pure derivation of a role, so it is
/// `Copy` and freely shareable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSet {
    /// See [`Capability::ManageServices`].
    pub can_manage_services: bool,
    /// See [`Capability::ManageEmails`].
    pub can_manage_emails: bool,
    /// See [`Capability::ManageUsers`].
    pub can_manage_users: bool,
    /// See [`Capability::ViewHealthChecks`].
    pub can_view_health_checks: bool,
    /// See [`Capability::DeleteServices`].
    pub can_delete_services: bool,
    /// See [`Capability::ViewDashboard`].
    pub can_view_dashboard: bool,
    /// See [`Capability::ViewAnalytics`].
    pub can_view_analytics: bool,
    /// See [`Capability::ManageSettings`].
    pub can_manage_settings: bool,
    /// See [`Capability::AccessSuperAdmin`].
    pub can_access_super_admin: bool,
}

impl PermissionSet {
    /// Look up a single capability.
    pub const fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::ManageServices => self.can_manage_services,
            Capability::ManageEmails => self.can_manage_emails,
            Capability::ManageUsers => self.can_manage_users,
            Capability::ViewHealthChecks => self.can_view_health_checks,
            Capability::DeleteServices => self.can_delete_services,
            Capability::ViewDashboard => self.can_view_dashboard,
            Capability::ViewAnalytics => self.can_view_analytics,
            Capability::ManageSettings => self.can_manage_settings,
            Capability::AccessSuperAdmin => self.can_access_super_admin,
        }
    }

    /// Capabilities this set grants, in table order.
    pub fn granted(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|cap| self.allows(*cap))
            .collect()
    }
}
