//! Session state machine labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the client is in the authentication lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No credential; the login surface is shown.
    #[default]
    Anonymous,
    /// A login request is in flight.
    Authenticating,
    /// A credential is stored and the user is known.
    Authenticated,
    /// The server rejected the session; immediately relabelled to
    /// [`SessionState::Anonymous`].
    SessionExpired,
}

impl SessionState {
    /// Return the state as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Authenticating => "authenticating",
            Self::Authenticated => "authenticated",
            Self::SessionExpired => "session_expired",
        }
    }

    /// Whether the state machine permits moving from `self` to `next`.
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        matches!(
            (self, next),
            (Self::Anonymous, Self::Authenticating)
                | (Self::Authenticating, Self::Authenticated)
                | (Self::Authenticating, Self::Anonymous)
                | (Self::Authenticated, Self::SessionExpired)
                | (Self::Authenticated, Self::Anonymous)
                | (Self::SessionExpired, Self::Anonymous)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single state change, broadcast to observers such as the navigation
/// layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTransition {
    /// State before the change.
    pub from: SessionState,
    /// State after the change.
    pub to: SessionState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_transitions() {
        use SessionState::*;
        assert!(Anonymous.can_transition_to(Authenticating));
        assert!(Authenticated.can_transition_to(SessionExpired));
        assert!(SessionExpired.can_transition_to(Anonymous));
        assert!(!Anonymous.can_transition_to(Authenticated));
        assert!(!SessionExpired.can_transition_to(Authenticated));
        assert!(!Authenticating.can_transition_to(SessionExpired));
    }
}
