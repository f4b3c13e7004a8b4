//! RBAC enforcement: turns a capability lookup into an allow/deny result.

use pulsewatch_core::error::AppError;
use pulsewatch_entity::permission::{Capability, PermissionSet};
use pulsewatch_entity::user::Role;

use super::policies::PermissionEngine;

/// Guards dashboard operations by capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct RbacEnforcer;

impl RbacEnforcer {
    /// Creates a new enforcer.
    pub fn new() -> Self {
        Self
    }

    /// Checks whether `role` holds `capability`.
    ///
    /// Returns `Ok(())` if allowed, or an authorization error naming the
    /// capability and the roles that would be allowed.
    pub fn require(&self, role: Role, capability: Capability) -> Result<(), AppError> {
        if PermissionEngine::has_capability(role, capability) {
            return Ok(());
        }

        let allowed: Vec<&str> = PermissionEngine::minimum_roles_for(capability)
            .iter()
            .map(Role::as_str)
            .collect();

        tracing::debug!(%role, %capability, "Capability denied");

        Err(AppError::authorization(format!(
            "Role '{role}' does not have permission '{capability}' (requires one of: {})",
            allowed.join(", ")
        )))
    }

    /// Checks whether `role` holds `capability` (returns bool).
    pub fn has_capability(&self, role: Role, capability: Capability) -> bool {
        PermissionEngine::has_capability(role, capability)
    }

    /// The full permission set of `role`.
    pub fn permissions(&self, role: Role) -> PermissionSet {
        PermissionEngine::permissions_for(role)
    }

    /// Checks whether `actual` is at least `minimum`.
    pub fn require_minimum_role(&self, actual: Role, minimum: Role) -> Result<(), AppError> {
        if actual.has_at_least(&minimum) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role '{actual}' is insufficient; minimum required: '{minimum}'"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsewatch_core::error::ErrorKind;

    #[test]
    fn test_require_denies_with_authorization_error() {
        let err = RbacEnforcer::new()
            .require(Role::Admin, Capability::ManageUsers)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert!(err.message.contains("canManageUsers"));
        assert!(err.message.contains("SUPERADMIN"));
    }

    #[test]
    fn test_require_allows() {
        let enforcer = RbacEnforcer::new();
        assert!(enforcer.require(Role::User, Capability::ViewDashboard).is_ok());
        assert!(enforcer.require(Role::SuperAdmin, Capability::AccessSuperAdmin).is_ok());
    }

    #[test]
    fn test_require_minimum_role() {
        let enforcer = RbacEnforcer::new();
        assert!(enforcer.require_minimum_role(Role::Admin, Role::User).is_ok());
        assert!(enforcer.require_minimum_role(Role::User, Role::Admin).is_err());
    }
}
