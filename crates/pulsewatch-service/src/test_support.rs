//! In-process transport for service tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use pulsewatch_api::{
    ApiGateway, ApiRequest, HttpMethod, Transport, TransportFailure, TransportResponse,
};
use pulsewatch_auth::{MemoryCredentialStore, TokenVault};
use pulsewatch_cache::ApiCache;
use pulsewatch_core::traits::CredentialStore;

pub(crate) const BASE_URL: &str = "http://api.test/api";

type Scripted = Result<TransportResponse, TransportFailure>;

/// Answers by `(method, path)`. The last scripted answer of a route repeats.
#[derive(Debug, Default)]
pub(crate) struct RouteTransport {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<Scripted>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl RouteTransport {
    pub(crate) fn on(&self, method: HttpMethod, path: &str, status: u16, body: Value) {
        self.push(method, path, Ok(TransportResponse::new(status, body)));
    }

    pub(crate) fn fail(&self, method: HttpMethod, path: &str) {
        self.push(method, path, Err(TransportFailure::no_response("connection refused")));
    }

    fn push(&self, method: HttpMethod, path: &str, answer: Scripted) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(answer);
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, method: HttpMethod, path: &str) -> usize {
        let url = format!("{BASE_URL}{path}");
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }
}

#[async_trait]
impl Transport for RouteTransport {
    async fn send(&self, request: ApiRequest) -> Result<TransportResponse, TransportFailure> {
        let path = request
            .url
            .strip_prefix(BASE_URL)
            .unwrap_or(&request.url)
            .to_string();
        let method = request.method;
        self.requests.lock().unwrap().push(request);

        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(&(method, path)) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Ok(TransportResponse::new(404, json!({"message": "No route"}))),
        }
    }
}

pub(crate) fn harness() -> (Arc<RouteTransport>, ApiGateway) {
    harness_over(Arc::new(MemoryCredentialStore::new()))
}

pub(crate) fn harness_over(store: Arc<dyn CredentialStore>) -> (Arc<RouteTransport>, ApiGateway) {
    let transport = Arc::new(RouteTransport::default());
    let vault = TokenVault::new(store, "test-secret").unwrap();
    let cache = Arc::new(
        ApiCache::with_intervals(Duration::from_secs(300), Duration::from_secs(600)).unwrap(),
    );
    let gateway = ApiGateway::new(BASE_URL, transport.clone(), vault, cache);
    (transport, gateway)
}

pub(crate) fn login_ok(transport: &RouteTransport, token: &str, role: &str) {
    transport.on(
        HttpMethod::Post,
        "/auth/login",
        200,
        json!({
            "statusCode": 200,
            "status": "success",
            "message": "Logged in",
            "data": {
                "token": token,
                "user": {"_id": "u1", "name": "Ada", "email": "ada@example.com", "role": role}
            }
        }),
    );
}
