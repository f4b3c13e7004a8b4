//! Deduplication, caching and expiry through the full request path.

use std::time::Duration;

use futures::future::join_all;
use serde_json::json;

use pulsewatch_api::HttpMethod;
use pulsewatch_cache::keys;
use pulsewatch_core::error::ErrorKind;
use pulsewatch_entity::service::ServiceInput;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_concurrent_reads_issue_one_request() {
    let app = TestApp::new();
    app.sign_in("USER").await;
    app.services(3);
    let gate = app.api.hold();

    let reads = join_all((0..8).map(|_| app.monitor.list_services()));
    let release = async {
        tokio::task::yield_now().await;
        gate.notify_one();
    };
    let (results, ()) = tokio::join!(reads, release);

    for result in results {
        assert_eq!(result.unwrap().len(), 3);
    }
    assert_eq!(app.api.count(HttpMethod::Get, "/services"), 1);
    assert_eq!(app.gateway.cache().inflight().pending_count(), 0);
}

#[tokio::test]
async fn test_shared_failure_reaches_every_waiter_and_is_not_cached() {
    let app = TestApp::new();
    app.sign_in("USER").await;
    app.api.on(HttpMethod::Get, "/services", 502, json!("Bad Gateway"));
    app.services(1);
    let gate = app.api.hold();

    let reads = join_all((0..4).map(|_| app.monitor.list_services()));
    let release = async {
        tokio::task::yield_now().await;
        gate.notify_one();
    };
    let (results, ()) = tokio::join!(reads, release);

    for result in results {
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Server);
        assert_eq!(err.message, "Bad Gateway");
    }
    assert!(app.gateway.cache().responses().get(&keys::services_list()).is_none());

    // The next read goes back to the server and succeeds.
    gate.notify_one();
    assert_eq!(app.monitor.list_services().await.unwrap().len(), 1);
    assert_eq!(app.api.count(HttpMethod::Get, "/services"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cached_reads_expire_after_ttl() {
    let app = TestApp::new();
    app.sign_in("USER").await;
    app.services(2);

    app.monitor.list_services().await.unwrap();
    tokio::time::advance(Duration::from_secs(299)).await;
    app.monitor.list_services().await.unwrap();
    assert_eq!(app.api.count(HttpMethod::Get, "/services"), 1);

    tokio::time::advance(Duration::from_secs(2)).await;
    app.monitor.list_services().await.unwrap();
    assert_eq!(app.api.count(HttpMethod::Get, "/services"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_sweeper_evicts_unread_entries() {
    let app = TestApp::new();
    app.sign_in("USER").await;
    app.services(1);
    app.monitor.list_services().await.unwrap();
    assert_eq!(app.gateway.cache().responses().len(), 1);

    tokio::time::sleep(Duration::from_secs(601)).await;

    assert_eq!(app.gateway.cache().responses().len(), 0);
}

#[tokio::test]
async fn test_mutation_invalidates_grouped_reads() {
    let app = TestApp::new();
    app.sign_in("ADMIN").await;
    app.services(1);
    app.api.on(
        HttpMethod::Post,
        "/services",
        201,
        json!({"data": {"_id": "svc-9", "name": "billing", "url": "https://billing.example.com", "intervalSeconds": 120}}),
    );

    app.monitor.list_services().await.unwrap();
    app.monitor
        .create_service(&ServiceInput::new("billing", "https://billing.example.com", 120))
        .await
        .unwrap();
    app.monitor.list_services().await.unwrap();

    assert_eq!(app.api.count(HttpMethod::Get, "/services"), 2);
    let post = app
        .api
        .requests()
        .into_iter()
        .find(|r| r.method == HttpMethod::Post && r.url.ends_with("/services"))
        .unwrap();
    assert_eq!(post.header("Authorization"), Some("Bearer token-ADMIN"));
    assert_eq!(post.header("Content-Type"), Some("application/json"));
    assert_eq!(post.body.unwrap()["intervalSeconds"], 120);
}

#[tokio::test]
async fn test_unreachable_server_is_service_unavailable() {
    let app = TestApp::new();
    app.sign_in("USER").await;
    app.api.unreachable(HttpMethod::Get, "/services");

    let err = app.monitor.list_services().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(err.message, "Service unavailable");
}
