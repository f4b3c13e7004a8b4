//! Session lifecycle across the gateway, vault and cache.

use serde_json::json;

use pulsewatch_api::HttpMethod;
use pulsewatch_auth::{TokenVault, VaultEntry};
use pulsewatch_core::error::ErrorKind;
use pulsewatch_entity::session::SessionState;
use pulsewatch_entity::user::Role;

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn test_unauthorized_mid_session_forces_single_expiry() {
    let app = TestApp::new();
    app.sign_in("ADMIN").await;
    app.services(2);
    app.monitor.list_services().await.unwrap();

    let mut transitions = app.session.transitions();
    app.api.on(HttpMethod::Get, "/analytics/summary", 401, json!({"message": "Session expired"}));

    let err = app.monitor.analytics_summary().await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(err.message, "Session expired");
    assert_eq!(app.session.state(), SessionState::Anonymous);
    assert!(app.gateway.vault().retrieve().await.unwrap().is_absent());
    assert!(app.gateway.cache().responses().is_empty());
    assert_eq!(app.session.role(), Role::User);

    assert_eq!(transitions.recv().await.unwrap().to, SessionState::SessionExpired);
    assert_eq!(transitions.recv().await.unwrap().to, SessionState::Anonymous);
    assert!(transitions.try_recv().is_err());

    // Guarded calls now fail closed without touching the network.
    let before = app.api.requests().len();
    assert_eq!(
        app.monitor.list_services().await.unwrap_err().kind,
        ErrorKind::Authentication
    );
    assert_eq!(app.api.requests().len(), before);
}

#[tokio::test]
async fn test_session_survives_restart_with_same_secret() {
    let path = helpers::temp_storage();

    let first = TestApp::persisted(&path, helpers::SECRET);
    first.sign_in("SUPERADMIN").await;
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("token-SUPERADMIN"));

    let second = TestApp::persisted(&path, helpers::SECRET);
    second.api.on(
        HttpMethod::Get,
        "/auth/me",
        200,
        json!({"data": {"_id": "u1", "email": "grace@example.com", "role": "SUPERADMIN"}}),
    );
    let user = second.session.restore().await.unwrap().unwrap();

    assert_eq!(user.role, Role::SuperAdmin);
    assert!(second.session.permissions().can_access_super_admin);
    let me = &second.api.requests()[0];
    assert_eq!(me.header("Authorization"), Some("Bearer token-SUPERADMIN"));

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[tokio::test]
async fn test_rotated_secret_reads_corrupt_and_restores_nothing() {
    let path = helpers::temp_storage();
    TestApp::persisted(&path, "old-secret").sign_in("USER").await;

    let rotated = TestApp::persisted(&path, "new-secret");
    let vault = TokenVault::new(rotated.store.clone(), "new-secret").unwrap();
    assert_eq!(vault.retrieve().await.unwrap(), VaultEntry::Corrupt);

    assert_eq!(rotated.session.restore().await.unwrap(), None);
    assert!(rotated.api.requests().is_empty());
    assert!(vault.retrieve().await.unwrap().is_absent());

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[tokio::test]
async fn test_logout_clears_everything_even_when_server_unreachable() {
    let app = TestApp::new();
    app.sign_in("USER").await;
    app.services(1);
    app.monitor.list_services().await.unwrap();
    app.api.unreachable(HttpMethod::Post, "/auth/logout");

    app.session.logout().await.unwrap();

    assert_eq!(app.session.state(), SessionState::Anonymous);
    assert!(app.gateway.vault().retrieve().await.unwrap().is_absent());
    assert!(app.gateway.cache().responses().is_empty());
    assert_eq!(app.session.current_user(), None);
}

#[tokio::test]
async fn test_read_in_flight_at_logout_does_not_leak_into_next_session() {
    let app = TestApp::new();
    app.sign_in("ADMIN").await;
    app.services(3);
    let gate = app.api.hold();

    let read = app.monitor.list_services();
    let sign_out = async {
        while app.api.count(HttpMethod::Get, "/services") == 0 {
            tokio::task::yield_now().await;
        }
        app.api.open();
        app.session.logout().await.unwrap();
        assert!(app.gateway.cache().responses().is_empty());
        gate.notify_one();
    };
    let (stale, ()) = tokio::join!(read, sign_out);
    assert_eq!(stale.unwrap().len(), 3);

    assert!(app.gateway.cache().responses().is_empty());
    assert_eq!(app.gateway.cache().inflight().pending_count(), 0);

    // The next session reads from the server, not from the stale request.
    app.sign_in("ADMIN").await;
    assert_eq!(app.monitor.list_services().await.unwrap().len(), 3);
    assert_eq!(app.api.count(HttpMethod::Get, "/services"), 2);
}

#[tokio::test]
async fn test_failed_login_can_be_retried() {
    let app = TestApp::new();
    app.api.on(HttpMethod::Post, "/auth/login", 401, json!({"error": "Bad password"}));
    let err = app
        .session
        .login(pulsewatch_entity::user::LoginCredentials::new("grace@example.com", "wrong"))
        .await
        .unwrap_err();
    assert_eq!(err.message, "Bad password");
    assert_eq!(app.session.state(), SessionState::Anonymous);

    app.sign_in("ADMIN").await;
    assert_eq!(app.session.state(), SessionState::Authenticated);
    assert_eq!(app.session.role(), Role::Admin);
}
