//! Login/refresh/logout state machine over the token vault.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use pulsewatch_api::{ApiGateway, HttpMethod, Schema, SessionObserver, TypedSchema};
use pulsewatch_auth::{Credential, PermissionEngine};
use pulsewatch_core::error::AppError;
use pulsewatch_core::result::AppResult;
use pulsewatch_core::types::ApiEnvelope;
use pulsewatch_entity::permission::PermissionSet;
use pulsewatch_entity::session::{SessionState, SessionTransition};
use pulsewatch_entity::user::{AuthPayload, LoginCredentials, Role, SessionUser};

const LOGIN_PATH: &str = "/auth/login";
const REFRESH_PATH: &str = "/auth/refresh";
const LOGOUT_PATH: &str = "/auth/logout";
const PROFILE_PATH: &str = "/auth/me";

/// Capacity of the transition broadcast; slow subscribers lag, they never block.
const TRANSITION_BUFFER: usize = 32;

/// Owns the session state and the signed-in user.
///
/// Every state change goes through one atomic compare-and-set on the watch
/// channel, so competing expiries and logins resolve to a single winner.
pub struct SessionController {
    /// Request path; also holds the vault and the cache.
    gateway: ApiGateway,
    /// Current state.
    state: watch::Sender<SessionState>,
    /// Every accepted transition.
    transitions: broadcast::Sender<SessionTransition>,
    /// The signed-in user, present only while authenticated.
    user: RwLock<Option<SessionUser>>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state())
            .field("role", &self.role())
            .finish()
    }
}

impl SessionController {
    /// Create the controller and register it for 401 notifications.
    pub fn new(gateway: ApiGateway) -> Arc<Self> {
        let (state, _) = watch::channel(SessionState::Anonymous);
        let (transitions, _) = broadcast::channel(TRANSITION_BUFFER);

        let controller = Arc::new(Self {
            gateway,
            state,
            transitions,
            user: RwLock::new(None),
        });

        let observer: Arc<dyn SessionObserver> = controller.clone();
        controller
            .gateway
            .set_session_observer(Arc::downgrade(&observer));

        controller
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    /// Receiver that always holds the latest state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Receiver of every transition from now on.
    pub fn transitions(&self) -> broadcast::Receiver<SessionTransition> {
        self.transitions.subscribe()
    }

    /// The signed-in user.
    pub fn current_user(&self) -> Option<SessionUser> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Role of the signed-in user, or [`Role::User`] when nobody is.
    pub fn role(&self) -> Role {
        self.user
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|user| user.role)
            .unwrap_or_default()
    }

    /// Capabilities of the current role.
    pub fn permissions(&self) -> PermissionSet {
        PermissionEngine::permissions_for(self.role())
    }

    /// Sign in.
    ///
    /// Only valid from `Anonymous`. On failure the session returns to
    /// `Anonymous` and the vault is left as it was.
    pub async fn login(&self, credentials: LoginCredentials) -> AppResult<SessionUser> {
        let current = self.state();
        if current != SessionState::Anonymous {
            return Err(AppError::conflict(format!(
                "Cannot log in while the session is {current}"
            )));
        }

        let raw = serde_json::to_value(&credentials)?;
        let body = TypedSchema::<LoginCredentials>::new()
            .validate(&raw)
            .into_result()?;

        if !self.transition(SessionState::Authenticating) {
            return Err(AppError::conflict("Another login is already in progress"));
        }

        match self.authenticate(body).await {
            Ok(user) => {
                self.set_user(Some(user.clone()));
                self.transition(SessionState::Authenticated);
                info!(user_id = %user.id, role = %user.role, "Signed in");
                Ok(user)
            }
            Err(e) => {
                self.transition(SessionState::Anonymous);
                debug!(error = %e.message, "Login failed");
                Err(e)
            }
        }
    }

    async fn authenticate(&self, body: Value) -> AppResult<SessionUser> {
        let envelope = self
            .gateway
            .send(HttpMethod::Post, LOGIN_PATH, Some(body))
            .await?;
        let payload: AuthPayload = envelope.data_as()?;
        if payload.token.is_empty() {
            return Err(AppError::authentication("Login response carried no token"));
        }

        // The vault is written only once the user is known, so a failed
        // login leaves any previously stored credential in place.
        let user = match payload.user {
            Some(user) => user,
            None => {
                let candidate = Credential::new(payload.token.clone());
                let envelope = self
                    .gateway
                    .send_as(HttpMethod::Get, PROFILE_PATH, None, &candidate)
                    .await?;
                profile_from(envelope)?
            }
        };

        self.gateway.vault().store(&payload.token).await?;
        Ok(user)
    }

    /// Exchange the current credential for a fresh one.
    ///
    /// Any failure expires the session.
    pub async fn refresh(&self) -> AppResult<()> {
        if !self.is_authenticated() {
            return Err(AppError::conflict("No active session to refresh"));
        }

        let outcome = async {
            let envelope = self
                .gateway
                .send(HttpMethod::Post, REFRESH_PATH, None)
                .await?;
            let payload: AuthPayload = envelope.data_as()?;
            if payload.token.is_empty() {
                return Err(AppError::authentication("Refresh response carried no token"));
            }
            self.gateway.vault().store(&payload.token).await?;
            Ok::<_, AppError>(payload.user)
        }
        .await;

        match outcome {
            Ok(user) => {
                if let Some(user) = user {
                    self.set_user(Some(user));
                }
                debug!("Session refreshed");
                Ok(())
            }
            Err(e) => {
                self.expire().await;
                Err(e)
            }
        }
    }

    /// Sign out: tell the server (best effort), drop the credential and
    /// every cached response, return to `Anonymous`.
    pub async fn logout(&self) -> AppResult<()> {
        match self.state() {
            SessionState::Anonymous => return Ok(()),
            SessionState::Authenticating => {
                return Err(AppError::conflict("Cannot log out while a login is in progress"));
            }
            SessionState::Authenticated | SessionState::SessionExpired => {}
        }

        if let Err(e) = self.gateway.send(HttpMethod::Post, LOGOUT_PATH, None).await {
            warn!(error = %e.message, "Server logout failed; clearing local session anyway");
        }

        // Local state is dropped before the credential so a storage failure
        // cannot leave the session half open.
        self.gateway.cache().clear();
        self.set_user(None);
        self.transition(SessionState::Anonymous);

        if let Err(e) = self.gateway.vault().clear().await {
            warn!(error = %e, "Signed out but the stored credential could not be removed");
            return Err(e);
        }
        info!("Signed out");
        Ok(())
    }

    /// Force the session closed after the server rejected it.
    ///
    /// Runs at most once per authenticated session: only the caller that
    /// moves `Authenticated → SessionExpired` clears the vault and cache.
    /// Returns whether this call performed the expiry.
    pub async fn expire(&self) -> bool {
        if !self.transition(SessionState::SessionExpired) {
            return false;
        }
        warn!("Session expired; clearing credential and cached responses");

        if let Err(e) = self.gateway.vault().clear().await {
            warn!(error = %e, "Failed to clear credential on expiry");
        }
        self.gateway.cache().clear();
        self.set_user(None);
        self.transition(SessionState::Anonymous);
        true
    }

    /// Rehydrate a session from a persisted credential.
    ///
    /// Returns `None` when no credential is stored or the server rejects it;
    /// a rejected credential is cleared. Network failures leave it in place.
    pub async fn restore(&self) -> AppResult<Option<SessionUser>> {
        let current = self.state();
        if current != SessionState::Anonymous {
            return Err(AppError::conflict(format!(
                "Cannot restore while the session is {current}"
            )));
        }
        if self.gateway.vault().credential().await?.is_none() {
            return Ok(None);
        }
        if !self.transition(SessionState::Authenticating) {
            return Err(AppError::conflict("Another login is already in progress"));
        }

        match self.fetch_profile().await {
            Ok(user) => {
                self.set_user(Some(user.clone()));
                self.transition(SessionState::Authenticated);
                info!(user_id = %user.id, "Session restored");
                Ok(Some(user))
            }
            Err(e) if e.is_authentication() => {
                self.gateway.vault().clear().await?;
                self.transition(SessionState::Anonymous);
                debug!("Stored credential rejected");
                Ok(None)
            }
            Err(e) => {
                self.transition(SessionState::Anonymous);
                Err(e)
            }
        }
    }

    async fn fetch_profile(&self) -> AppResult<SessionUser> {
        let envelope = self.gateway.send(HttpMethod::Get, PROFILE_PATH, None).await?;
        profile_from(envelope)
    }

    fn set_user(&self, user: Option<SessionUser>) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = user;
    }

    /// Move to `to` if the state machine allows it from the current state.
    fn transition(&self, to: SessionState) -> bool {
        let transitions = &self.transitions;
        self.state.send_if_modified(|current| {
            if !current.can_transition_to(to) {
                return false;
            }
            let from = *current;
            *current = to;
            info!(%from, %to, "Session transition");
            // No subscribers is fine.
            let _ = transitions.send(SessionTransition { from, to });
            true
        })
    }
}

/// The profile is either the payload itself or nested under `user`.
fn profile_from(envelope: ApiEnvelope) -> AppResult<SessionUser> {
    let data = match envelope.data {
        Value::Object(mut map) if map.contains_key("user") => {
            map.remove("user").unwrap_or(Value::Null)
        }
        other => other,
    };
    Ok(serde_json::from_value(data)?)
}

#[async_trait]
impl SessionObserver for SessionController {
    async fn on_unauthorized(&self, error: &AppError) {
        match self.state() {
            SessionState::Authenticated => {
                warn!(error = %error.message, "Credential rejected by server");
                self.expire().await;
            }
            state => debug!(%state, "Ignoring unauthorized response outside an active session"),
        }
    }
}
