//! Role-to-capability table.

use pulsewatch_entity::permission::{Capability, PermissionSet};
use pulsewatch_entity::user::Role;

/// Capabilities of [`Role::User`], also the fail-closed default.
pub const USER_PERMISSIONS: PermissionSet = PermissionSet {
    can_manage_services: true,
    can_manage_emails: false,
    can_manage_users: false,
    can_view_health_checks: true,
    can_delete_services: false,
    can_view_dashboard: true,
    can_view_analytics: false,
    can_manage_settings: false,
    can_access_super_admin: false,
};

/// Capabilities of [`Role::Admin`].
pub const ADMIN_PERMISSIONS: PermissionSet = PermissionSet {
    can_manage_services: true,
    can_manage_emails: true,
    can_manage_users: false,
    can_view_health_checks: true,
    can_delete_services: true,
    can_view_dashboard: true,
    can_view_analytics: true,
    can_manage_settings: true,
    can_access_super_admin: false,
};

/// Capabilities of [`Role::SuperAdmin`].
pub const SUPERADMIN_PERMISSIONS: PermissionSet = PermissionSet {
    can_manage_services: true,
    can_manage_emails: true,
    can_manage_users: true,
    can_view_health_checks: true,
    can_delete_services: true,
    can_view_dashboard: true,
    can_view_analytics: true,
    can_manage_settings: true,
    can_access_super_admin: true,
};

/// Pure role-to-capability lookup. Holds no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionEngine;

impl PermissionEngine {
    /// The permission set of `role`.
    pub const fn permissions_for(role: Role) -> PermissionSet {
        match role {
            Role::User => USER_PERMISSIONS,
            Role::Admin => ADMIN_PERMISSIONS,
            Role::SuperAdmin => SUPERADMIN_PERMISSIONS,
        }
    }

    /// The permission set of an untrusted role value. Unknown or missing
    /// values get the [`Role::User`] set.
    pub fn permissions_for_raw(raw: Option<&str>) -> PermissionSet {
        Self::permissions_for(Role::from_raw(raw))
    }

    /// Whether `role` holds `capability`.
    pub const fn has_capability(role: Role, capability: Capability) -> bool {
        Self::permissions_for(role).allows(capability)
    }

    /// Whether an untrusted role value holds `capability`.
    pub fn has_capability_raw(raw: Option<&str>, capability: Capability) -> bool {
        Self::permissions_for_raw(raw).allows(capability)
    }

    /// Every role holding `capability`, in ascending privilege order.
    pub fn minimum_roles_for(capability: Capability) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| Self::has_capability(*role, capability))
            .collect()
    }
}
