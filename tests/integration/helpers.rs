//! Shared test helpers for integration tests.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Notify;

use pulsewatch_api::{
    ApiGateway, ApiRequest, HttpMethod, Transport, TransportFailure, TransportResponse,
};
use pulsewatch_auth::{FileCredentialStore, MemoryCredentialStore, TokenVault};
use pulsewatch_cache::ApiCache;
use pulsewatch_core::traits::CredentialStore;
use pulsewatch_entity::user::LoginCredentials;
use pulsewatch_service::{MonitorService, SessionController};

pub const BASE_URL: &str = "http://dashboard.test/api";
pub const SECRET: &str = "integration-secret";

type Scripted = Result<TransportResponse, TransportFailure>;

/// Fake monitoring API answering by `(method, path)`.
///
/// The last scripted answer of a route repeats. When a gate is installed,
/// every request waits on it before answering.
#[derive(Debug, Default)]
pub struct FakeApi {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<Scripted>>>,
    requests: Mutex<Vec<ApiRequest>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeApi {
    pub fn on(&self, method: HttpMethod, path: &str, status: u16, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Ok(TransportResponse::new(status, body)));
    }

    pub fn unreachable(&self, method: HttpMethod, path: &str) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Err(TransportFailure::no_response("connection refused")));
    }

    pub fn hold(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Stop gating new requests. Requests already waiting keep waiting.
    pub fn open(&self) {
        *self.gate.lock().unwrap() = None;
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        let url = format!("{BASE_URL}{path}");
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }
}

#[async_trait]
impl Transport for FakeApi {
    async fn send(&self, request: ApiRequest) -> Result<TransportResponse, TransportFailure> {
        let key = (
            request.method,
            request
                .url
                .strip_prefix(BASE_URL)
                .unwrap_or(&request.url)
                .to_string(),
        );
        self.requests.lock().unwrap().push(request);

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Ok(TransportResponse::new(404, json!({"message": "Not found"}))),
        }
    }
}

/// A fully wired client core.
pub struct TestApp {
    pub api: Arc<FakeApi>,
    pub gateway: ApiGateway,
    pub session: Arc<SessionController>,
    pub monitor: MonitorService,
    pub store: Arc<dyn CredentialStore>,
}

impl TestApp {
    /// Client with an in-memory credential store.
    pub fn new() -> Self {
        Self::over(Arc::new(MemoryCredentialStore::new()), SECRET)
    }

    /// Client persisting its credential to `path`.
    pub fn persisted(path: &PathBuf, secret: &str) -> Self {
        Self::over(Arc::new(FileCredentialStore::new(path)), secret)
    }

    fn over(store: Arc<dyn CredentialStore>, secret: &str) -> Self {
        let api = Arc::new(FakeApi::default());
        let vault = TokenVault::new(store.clone(), secret).unwrap();
        let cache = Arc::new(
            ApiCache::with_intervals(Duration::from_secs(300), Duration::from_secs(600)).unwrap(),
        );
        let gateway = ApiGateway::new(BASE_URL, api.clone(), vault, cache);
        let session = SessionController::new(gateway.clone());
        let monitor = MonitorService::new(gateway.clone(), session.clone());

        Self {
            api,
            gateway,
            session,
            monitor,
            store,
        }
    }

    /// Script a successful login for `role` and sign in.
    pub async fn sign_in(&self, role: &str) {
        self.api.on(
            HttpMethod::Post,
            "/auth/login",
            200,
            json!({
                "statusCode": 200,
                "status": "success",
                "message": "Login successful",
                "data": {
                    "token": format!("token-{role}"),
                    "user": {"_id": "u1", "name": "Grace", "email": "grace@example.com", "role": role}
                }
            }),
        );
        self.session
            .login(LoginCredentials::new("grace@example.com", "correct horse"))
            .await
            .unwrap();
    }

    /// Script `/services` to return `count` services.
    pub fn services(&self, count: usize) {
        let data: Vec<Value> = (0..count)
            .map(|i| {
                json!({
                    "_id": format!("svc-{i}"),
                    "name": format!("service {i}"),
                    "url": format!("https://svc{i}.example.com/health"),
                    "intervalSeconds": 60,
                    "status": "up"
                })
            })
            .collect();
        self.api.on(HttpMethod::Get, "/services", 200, json!({"data": data}));
    }
}

/// Unique storage file path under the system temp dir.
pub fn temp_storage() -> PathBuf {
    std::env::temp_dir()
        .join(format!("pulsewatch-it-{}", uuid::Uuid::new_v4()))
        .join("storage.json")
}
