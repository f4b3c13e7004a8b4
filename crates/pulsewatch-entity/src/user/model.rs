//! User entity models.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::role::Role;

/// The signed-in user as reported by the login and profile endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Server-side user identifier.
    #[serde(alias = "_id")]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// RBAC role. Missing or unknown values resolve to [`Role::User`].
    #[serde(default)]
    pub role: Role,
}

/// Email/password pair submitted to the login endpoint.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct LoginCredentials {
    /// Login email.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// Plaintext password, sent once over the transport.
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

impl LoginCredentials {
    /// Build credentials from raw input.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Payload returned by login and refresh: a bearer token and, on login,
/// the user it belongs to.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    /// Bearer token.
    #[serde(alias = "accessToken")]
    pub token: String,
    /// The authenticated user, when the endpoint includes it.
    #[serde(default)]
    pub user: Option<SessionUser>,
}

impl std::fmt::Debug for AuthPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthPayload")
            .field("token", &"***")
            .field("user", &self.user)
            .finish()
    }
}

/// Request body for changing another user's role.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoleChange {
    /// The role to assign.
    pub role: Role,
}
