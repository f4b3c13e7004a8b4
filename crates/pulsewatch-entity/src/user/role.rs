//! User role enumeration.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Roles available in the RBAC system.
///
/// Roles are ordered by privilege level: SuperAdmin > Admin > User. The
/// derived `Ord` follows declaration order, so `Role::User < Role::Admin`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// Regular dashboard user. Also the fail-closed default.
    #[default]
    User,
    /// Can manage alert emails, settings and delete services.
    Admin,
    /// Full platform access, including user management.
    SuperAdmin,
}

impl Role {
    /// All roles in ascending privilege order.
    pub const ALL: [Role; 3] = [Role::User, Role::Admin, Role::SuperAdmin];

    /// Resolve an untrusted role value.
    ///
    /// Only the exact wire names are recognised. Anything else, including
    /// other casings and padded values, resolves to [`Role::User`].
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.and_then(Self::from_wire).unwrap_or_default()
    }

    /// Match an exact wire name.
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == value)
    }

    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::User => 1,
            Self::Admin => 2,
            Self::SuperAdmin => 3,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &Role) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Return the wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
            Self::SuperAdmin => "SUPERADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lenient parse for operator input such as CLI arguments: case and
/// surrounding whitespace are ignored. Server values go through
/// [`Role::from_raw`].
impl FromStr for Role {
    type Err = pulsewatch_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            "SUPERADMIN" => Ok(Self::SuperAdmin),
            _ => Err(pulsewatch_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: USER, ADMIN, SUPERADMIN"
            ))),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    /// Deserialization never fails: anything that is not a known role name
    /// (including `null` and non-string values) becomes [`Role::User`].
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(Self::from_raw(raw.as_ref().and_then(|v| v.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privilege_ordering() {
        assert!(Role::SuperAdmin.has_at_least(&Role::User));
        assert!(Role::Admin.has_at_least(&Role::Admin));
        assert!(!Role::User.has_at_least(&Role::Admin));
        assert!(Role::User < Role::Admin && Role::Admin < Role::SuperAdmin);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("SUPERADMIN".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert_eq!(" admin ".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_non_canonical_wire_names_fail_closed() {
        for raw in ["admin", "Admin", " ADMIN", "superadmin", " SUPERADMIN ", "SuperAdmin"] {
            assert_eq!(Role::from_raw(Some(raw)), Role::User, "{raw:?}");
        }
        assert_eq!(Role::from_raw(Some("ADMIN")), Role::Admin);
        assert_eq!(Role::from_raw(Some("SUPERADMIN")), Role::SuperAdmin);

        let parsed: Role = serde_json::from_str("\"superadmin\"").unwrap();
        assert_eq!(parsed, Role::User);
    }

    #[test]
    fn test_unknown_roles_fail_closed() {
        assert_eq!(Role::from_raw(None), Role::User);
        assert_eq!(Role::from_raw(Some("OWNER")), Role::User);
        assert_eq!(Role::from_raw(Some("")), Role::User);

        let parsed: Role = serde_json::from_str("\"GOD_MODE\"").unwrap();
        assert_eq!(parsed, Role::User);
        let parsed: Role = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, Role::User);
        let parsed: Role = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, Role::User);
    }

    #[test]
    fn test_serializes_wire_name() {
        assert_eq!(
            serde_json::to_string(&Role::SuperAdmin).unwrap(),
            "\"SUPERADMIN\""
        );
    }
}
