//! The process-wide cache service shared by every API consumer.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use pulsewatch_core::config::CacheConfig;
use pulsewatch_core::error::AppError;
use pulsewatch_core::result::AppResult;

use crate::dedup::RequestDeduplicator;
use crate::memory::ResponseCache;
use crate::sweeper::spawn_sweeper;

/// Owns the response cache, the pending-operation map, and the sweeper task.
///
/// Construct one instance at startup and share it by `Arc`. The sweeper
/// starts in [`ApiCache::new`] and stops on [`ApiCache::shutdown`] or drop.
pub struct ApiCache {
    /// Stored responses.
    responses: Arc<ResponseCache>,
    /// In-flight reads.
    inflight: RequestDeduplicator<Value>,
    /// Bumped by [`ApiCache::clear`]. Reads started under an older
    /// generation neither store their result nor accept new joiners.
    generation: Arc<AtomicU64>,
    /// Signals the sweeper to stop.
    shutdown: watch::Sender<bool>,
    /// Sweeper task handle, taken on shutdown.
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for ApiCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCache")
            .field("entries", &self.responses.len())
            .field("inflight", &self.inflight.pending_count())
            .finish()
    }
}

impl ApiCache {
    /// Create the cache service and start its sweeper.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: &CacheConfig) -> AppResult<Self> {
        Self::with_intervals(config.default_ttl(), config.sweep_interval())
    }

    /// Create the cache service with explicit TTL and sweep interval.
    pub fn with_intervals(default_ttl: Duration, sweep_interval: Duration) -> AppResult<Self> {
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(AppError::internal(
                "ApiCache must be created inside a tokio runtime",
            ));
        }
        if sweep_interval.is_zero() {
            return Err(AppError::configuration(
                "Cache sweep interval must be greater than zero",
            ));
        }

        let responses = Arc::new(ResponseCache::new(default_ttl));
        let (shutdown, shutdown_rx) = watch::channel(false);
        let handle = spawn_sweeper(Arc::clone(&responses), sweep_interval, shutdown_rx);

        info!(
            default_ttl_secs = default_ttl.as_secs(),
            sweep_interval_secs = sweep_interval.as_secs(),
            "Response cache started"
        );

        Ok(Self {
            responses,
            inflight: RequestDeduplicator::new(),
            generation: Arc::new(AtomicU64::new(0)),
            shutdown,
            sweeper: Mutex::new(Some(handle)),
        })
    }

    /// The underlying response store.
    pub fn responses(&self) -> &ResponseCache {
        &self.responses
    }

    /// The in-flight request table.
    pub fn inflight(&self) -> &RequestDeduplicator<Value> {
        &self.inflight
    }

    /// Serve `key` from the cache, or run `operation` once for all
    /// concurrent callers and cache its successful result for `ttl`
    /// (the default TTL when `None`). Failures are never cached.
    pub async fn fetch<F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        operation: F,
    ) -> AppResult<Value>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = AppResult<Value>> + Send + 'static,
    {
        if let Some(hit) = self.responses.get(key) {
            debug!(key, "Cache hit");
            return Ok(hit);
        }
        debug!(key, "Cache miss");

        let responses = Arc::clone(&self.responses);
        let generation = Arc::clone(&self.generation);
        let started = generation.load(Ordering::SeqCst);
        let owned_key = key.to_string();
        let ttl = ttl.unwrap_or_else(|| self.responses.default_ttl());

        self.inflight
            .dedupe(&format!("{started}:{key}"), move || async move {
                let value = operation().await?;
                if generation.load(Ordering::SeqCst) == started {
                    responses.set(&owned_key, value.clone(), ttl);
                    // A clear that landed between the check and the store.
                    if generation.load(Ordering::SeqCst) != started {
                        responses.delete(&owned_key);
                    }
                } else {
                    debug!(key = %owned_key, "Discarding read from a cleared generation");
                }
                Ok(value)
            })
            .await
    }

    /// Invalidate one key.
    pub fn invalidate(&self, key: &str) {
        self.responses.delete(key);
    }

    /// Invalidate every key under `prefix`.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        self.responses.delete_prefix(prefix)
    }

    /// Drop every cached response.
    ///
    /// Reads still in flight finish for their callers but are not stored,
    /// and later reads of the same key start a fresh request.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.responses.clear();
        debug!("Response cache cleared");
    }

    /// Stop the sweeper and wait for it to exit.
    pub async fn shutdown(&self) {
        let _ = self.shutdown.send(true);
        let handle = self
            .sweeper
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

impl Drop for ApiCache {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}
