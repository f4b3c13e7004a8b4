//! Collapsing of concurrent identical in-flight operations.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use serde_json::Value;
use tracing::debug;

use pulsewatch_core::result::AppResult;

/// The shared, not-yet-settled outcome of a pending operation.
type PendingOutcome<T> = Shared<BoxFuture<'static, AppResult<T>>>;

/// Pending operations keyed by dedup key.
type PendingMap<T> = Mutex<HashMap<String, PendingOutcome<T>>>;

/// Ensures at most one operation per key is in flight.
///
/// Every caller that arrives while an operation is pending receives a
/// clone of the same settled outcome, success or failure. The entry is
/// removed as soon as the operation settles, so a later call with the same
/// key starts a fresh operation.
pub struct RequestDeduplicator<T = Value> {
    /// Key to shared outcome.
    pending: Arc<PendingMap<T>>,
}

impl<T> std::fmt::Debug for RequestDeduplicator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestDeduplicator")
            .field("pending", &lock(&self.pending).len())
            .finish()
    }
}

impl<T> RequestDeduplicator<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an empty deduplicator.
    pub fn new() -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Run `operation` unless an operation for `key` is already pending, in
    /// which case join it instead.
    ///
    /// The pending-map check and registration happen under one lock before
    /// the first suspension point, so two callers can never both start an
    /// operation for the same key. `operation` is invoked by the registering
    /// caller's first poll and must not call back into this deduplicator
    /// with the same key.
    pub async fn dedupe<F, Fut>(&self, key: &str, operation: F) -> AppResult<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        let outcome = self.register(key, operation);
        outcome.await
    }

    /// Whether an operation for `key` is currently pending.
    pub fn is_pending(&self, key: &str) -> bool {
        lock(&self.pending).contains_key(key)
    }

    /// Number of pending operations.
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    fn register<F, Fut>(&self, key: &str, operation: F) -> PendingOutcome<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        let mut pending = lock(&self.pending);

        if let Some(existing) = pending.get(key) {
            debug!(key, "Joining in-flight request");
            return existing.clone();
        }

        let registry = Arc::clone(&self.pending);
        let owned_key = key.to_string();
        let outcome = async move {
            let result = operation().await;
            lock(&registry).remove(&owned_key);
            result
        }
        .boxed()
        .shared();

        pending.insert(key.to_string(), outcome.clone());
        outcome
    }
}

impl<T> Default for RequestDeduplicator<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(pending: &PendingMap<T>) -> MutexGuard<'_, HashMap<String, PendingOutcome<T>>> {
    pending.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use pulsewatch_core::AppError;
    use serde_json::json;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn test_concurrent_calls_invoke_operation_once() {
        let dedup: RequestDeduplicator = RequestDeduplicator::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let release = Arc::new(Notify::new());

        let op = |calls: Arc<AtomicUsize>, release: Arc<Notify>| {
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                release.notified().await;
                Ok(json!({"services": 3}))
            }
        };

        let first = dedup.dedupe("X", op(calls.clone(), release.clone()));
        let second = dedup.dedupe("X", op(calls.clone(), release.clone()));
        let releaser = async {
            tokio::task::yield_now().await;
            assert!(dedup.is_pending("X"));
            release.notify_one();
        };

        let (a, b, ()) = tokio::join!(first, second, releaser);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.unwrap(), json!({"services": 3}));
        assert_eq!(b.unwrap(), json!({"services": 3}));
        assert_eq!(dedup.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_is_shared_identically() {
        let dedup: RequestDeduplicator = RequestDeduplicator::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let make = |calls: Arc<AtomicUsize>| {
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                Err::<Value, _>(AppError::server("Database offline").with_status(500))
            }
        };

        let (a, b) = tokio::join!(
            dedup.dedupe("Y", make(calls.clone())),
            dedup.dedupe("Y", make(calls.clone()))
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let (a, b) = (a.unwrap_err(), b.unwrap_err());
        assert_eq!(a, b);
        assert_eq!(a.message, "Database offline");
    }

    #[tokio::test]
    async fn test_settled_key_starts_fresh_operation() {
        let dedup: RequestDeduplicator = RequestDeduplicator::new();

        let first = dedup
            .dedupe("Z", || async { Err(AppError::network("Service unavailable")) })
            .await;
        assert!(first.is_err());
        assert!(!dedup.is_pending("Z"));

        let second = dedup.dedupe("Z", || async { Ok(json!("fresh")) }).await;
        assert_eq!(second.unwrap(), json!("fresh"));
    }

    #[tokio::test]
    async fn test_distinct_keys_run_independently() {
        let dedup: RequestDeduplicator<u32> = RequestDeduplicator::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let make = |calls: Arc<AtomicUsize>, value: u32| {
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(value)
            }
        };

        let (a, b) = tokio::join!(
            dedup.dedupe("one", make(calls.clone(), 1)),
            dedup.dedupe("two", make(calls.clone(), 2))
        );

        assert_eq!((a.unwrap(), b.unwrap()), (1, 2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
