//! Role/capability table and its enforcement at the service boundary.

use pulsewatch_auth::PermissionEngine;
use pulsewatch_core::error::ErrorKind;
use pulsewatch_entity::permission::Capability;
use pulsewatch_entity::user::Role;

use crate::helpers::TestApp;

#[test]
fn test_capability_matrix() {
    use Capability::*;
    let expected = [
        (ManageServices, [true, true, true]),
        (ManageEmails, [false, true, true]),
        (ManageUsers, [false, false, true]),
        (ViewHealthChecks, [true, true, true]),
        (DeleteServices, [false, true, true]),
        (ViewDashboard, [true, true, true]),
        (ViewAnalytics, [false, true, true]),
        (ManageSettings, [false, true, true]),
        (AccessSuperAdmin, [false, false, true]),
    ];

    for (capability, grants) in expected {
        for (role, granted) in Role::ALL.into_iter().zip(grants) {
            assert_eq!(
                PermissionEngine::has_capability(role, capability),
                granted,
                "{role} / {capability}"
            );
        }
    }
}

#[test]
fn test_unknown_or_missing_role_fails_closed() {
    let user = PermissionEngine::permissions_for(Role::User);
    assert_eq!(PermissionEngine::permissions_for_raw(None), user);
    assert_eq!(PermissionEngine::permissions_for_raw(Some("ROOT")), user);
    assert_eq!(PermissionEngine::permissions_for_raw(Some("")), user);
    assert!(!PermissionEngine::has_capability_raw(
        Some("superuser"),
        Capability::AccessSuperAdmin
    ));
}

#[tokio::test]
async fn test_denied_operations_never_reach_the_server() {
    let app = TestApp::new();
    app.sign_in("USER").await;
    let before = app.api.requests().len();

    let denied = [
        app.monitor.delete_service("svc-1").await.unwrap_err(),
        app.monitor.alert_emails().await.unwrap_err(),
        app.monitor.list_users().await.unwrap_err(),
        app.monitor.analytics_summary().await.unwrap_err(),
        app.monitor.settings().await.unwrap_err(),
        app.monitor.platform_overview().await.unwrap_err(),
    ];

    for err in denied {
        assert_eq!(err.kind, ErrorKind::Authorization);
    }
    assert_eq!(app.api.requests().len(), before);
}

#[tokio::test]
async fn test_unknown_server_role_signs_in_as_user() {
    let app = TestApp::new();
    app.sign_in("ROOT").await;

    assert_eq!(app.session.role(), Role::User);
    assert!(!app.session.permissions().can_delete_services);
}
