//! The central request path.
//!
//! Every call goes through one dispatch path: the credential is
//! attached, the transport is invoked, and a non-2xx or missing response is
//! normalized into an `AppError`. A 401 additionally notifies the registered
//! [`SessionObserver`] exactly once per failed request.

use std::sync::{Arc, RwLock, Weak};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use pulsewatch_auth::{Credential, TokenVault};
use pulsewatch_cache::keys::request_key;
use pulsewatch_cache::provider::ApiCache;
use pulsewatch_core::error::AppError;
use pulsewatch_core::result::AppResult;
use pulsewatch_core::types::ApiEnvelope;

use crate::normalizer::ErrorNormalizer;
use crate::transport::{ApiRequest, HttpMethod, Transport};
use crate::validation::Schema;

/// Reacts to the server rejecting the session credential.
#[async_trait]
pub trait SessionObserver: Send + Sync {
    /// Called once for each request that came back 401.
    async fn on_unauthorized(&self, error: &AppError);
}

/// Caching options for a read.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Grouping key; defaults to `GET:<url>`.
    pub cache_key: Option<String>,
    /// Entry lifetime; defaults to the cache's default TTL.
    pub ttl: Option<Duration>,
    /// Drop any cached entry first so the read goes to the server.
    pub refresh: bool,
}

impl ReadOptions {
    /// Options keyed under `key`.
    pub fn keyed(key: impl Into<String>) -> Self {
        Self {
            cache_key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Set the entry lifetime.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Force a server round-trip.
    pub fn refresh(mut self) -> Self {
        self.refresh = true;
        self
    }
}

/// A state-changing request.
pub struct Mutation<'a> {
    /// Verb; never `GET`.
    pub method: HttpMethod,
    /// Path relative to the base URL.
    pub path: String,
    /// Raw payload.
    pub body: Option<Value>,
    /// Schema the payload must satisfy before anything is sent.
    pub schema: Option<&'a dyn Schema>,
    /// Cache keys dropped after success.
    pub invalidate: Vec<String>,
    /// Cache key prefixes dropped after success.
    pub invalidate_prefixes: Vec<String>,
}

impl<'a> Mutation<'a> {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            schema: None,
            invalidate: Vec::new(),
            invalidate_prefixes: Vec::new(),
        }
    }

    /// `POST path`.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// `PUT path`.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// `PATCH path`.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    /// `DELETE path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Attach a payload.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Validate the payload against `schema` before dispatch.
    pub fn schema(mut self, schema: &'a dyn Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Drop `key` from the cache after success.
    pub fn invalidates(mut self, key: impl Into<String>) -> Self {
        self.invalidate.push(key.into());
        self
    }

    /// Drop every key under `prefix` after success.
    pub fn invalidates_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.invalidate_prefixes.push(prefix.into());
        self
    }
}

struct GatewayInner {
    base_url: String,
    transport: Arc<dyn Transport>,
    vault: TokenVault,
    cache: Arc<ApiCache>,
    observer: RwLock<Option<Weak<dyn SessionObserver>>>,
}

/// Cheaply cloneable handle on the shared request path.
#[derive(Clone)]
pub struct ApiGateway {
    inner: Arc<GatewayInner>,
}

impl std::fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiGateway")
            .field("base_url", &self.inner.base_url)
            .field("transport", &self.inner.transport)
            .finish_non_exhaustive()
    }
}

impl ApiGateway {
    /// Create a gateway rooted at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        vault: TokenVault,
        cache: Arc<ApiCache>,
    ) -> Self {
        Self {
            inner: Arc::new(GatewayInner {
                base_url: base_url.into().trim_end_matches('/').to_string(),
                transport,
                vault,
                cache,
                observer: RwLock::new(None),
            }),
        }
    }

    /// Register the observer told about 401 responses. Held weakly.
    pub fn set_session_observer(&self, observer: Weak<dyn SessionObserver>) {
        *self
            .inner
            .observer
            .write()
            .unwrap_or_else(|e| e.into_inner()) = Some(observer);
    }

    /// The credential vault requests are signed from.
    pub fn vault(&self) -> &TokenVault {
        &self.inner.vault
    }

    /// The shared response cache.
    pub fn cache(&self) -> &Arc<ApiCache> {
        &self.inner.cache
    }

    /// Absolute URL for `path`. Absolute inputs pass through.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    /// Cached, deduplicated `GET`.
    ///
    /// Concurrent reads of the same key share one transport call; successful
    /// envelopes are cached, failures are not.
    pub async fn get(&self, path: &str, options: ReadOptions) -> AppResult<ApiEnvelope> {
        let url = self.url(path);
        let key = options
            .cache_key
            .unwrap_or_else(|| request_key(HttpMethod::Get.as_str(), &url));

        if options.refresh {
            self.inner.cache.invalidate(&key);
        }

        let gateway = self.clone();
        let value = self
            .inner
            .cache
            .fetch(&key, options.ttl, move || async move {
                let envelope = gateway.dispatch(HttpMethod::Get, url, None).await?;
                Ok::<_, AppError>(serde_json::to_value(envelope)?)
            })
            .await?;

        Ok(serde_json::from_value(value)?)
    }

    /// Uncached request, bypassing validation and invalidation.
    pub async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> AppResult<ApiEnvelope> {
        self.dispatch(method, self.url(path), body).await
    }

    /// Uncached request signed with `credential` instead of the vault's.
    ///
    /// Lets a caller try out a token before persisting it.
    pub async fn send_as(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        credential: &Credential,
    ) -> AppResult<ApiEnvelope> {
        self.dispatch_signed(method, self.url(path), body, Some(credential.clone()))
            .await
    }

    /// Run a mutation.
    ///
    /// A payload failing its schema is rejected with a validation error and
    /// never reaches the transport. On success the `GET` key for the same
    /// path and every requested key/prefix are invalidated.
    pub async fn mutate(&self, mutation: Mutation<'_>) -> AppResult<ApiEnvelope> {
        let Mutation {
            method,
            path,
            body,
            schema,
            invalidate,
            invalidate_prefixes,
        } = mutation;

        let body = match schema {
            Some(schema) => {
                let raw = body.unwrap_or(Value::Null);
                Some(schema.validate(&raw).into_result().inspect_err(|e| {
                    debug!(%method, path, error = %e.message, "Payload rejected before dispatch");
                })?)
            }
            None => body,
        };

        let url = self.url(&path);
        let envelope = self.dispatch(method, url.clone(), body).await?;

        let cache = &self.inner.cache;
        cache.invalidate(&request_key(HttpMethod::Get.as_str(), &url));
        for key in &invalidate {
            cache.invalidate(key);
        }
        for prefix in &invalidate_prefixes {
            cache.invalidate_prefix(prefix);
        }

        Ok(envelope)
    }

    async fn dispatch(
        &self,
        method: HttpMethod,
        url: String,
        body: Option<Value>,
    ) -> AppResult<ApiEnvelope> {
        let credential = self.inner.vault.credential().await?;
        self.dispatch_signed(method, url, body, credential).await
    }

    async fn dispatch_signed(
        &self,
        method: HttpMethod,
        url: String,
        body: Option<Value>,
        credential: Option<Credential>,
    ) -> AppResult<ApiEnvelope> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(credential) = credential {
            headers.push(("Authorization".to_string(), credential.bearer()));
        }

        debug!(%method, url, "Dispatching request");

        let request = ApiRequest {
            method,
            url,
            headers,
            body,
        };
        let url = request.url.clone();

        match self.inner.transport.send(request).await {
            Ok(response) if response.is_success() => {
                Ok(ApiEnvelope::from_body(response.status, response.body))
            }
            Ok(response) => {
                let error = ErrorNormalizer::classify(&response);
                warn!(%method, url, status = response.status, error = %error.message, "Request failed");
                if error.is_authentication() {
                    self.notify_unauthorized(&error).await;
                }
                Err(error)
            }
            Err(failure) => Err(ErrorNormalizer::network(&failure)),
        }
    }

    async fn notify_unauthorized(&self, error: &AppError) {
        let observer = self
            .inner
            .observer
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .and_then(Weak::upgrade);

        match observer {
            Some(observer) => observer.on_unauthorized(error).await,
            None => debug!("Unauthorized response with no session observer registered"),
        }
    }
}
