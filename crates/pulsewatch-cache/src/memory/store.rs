//! In-memory TTL cache of successful read responses.

use std::time::Duration;

use dashmap::DashMap;
use serde_json::Value;
use tokio::time::Instant;
use tracing::debug;

/// Default TTL applied by [`ResponseCache::set_default`].
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// A stored response stamped with its insertion time.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached response body.
    pub value: Value,
    /// When the entry was written.
    pub stored_at: Instant,
    /// How long the entry stays valid.
    pub ttl: Duration,
}

impl CacheEntry {
    /// An entry is valid iff `now - stored_at < ttl`.
    pub fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) < self.ttl
    }
}

/// TTL-keyed store of prior successful reads.
///
/// All operations are synchronous and hold a shard lock only for the
/// duration of a single map operation, so no reader can observe a
/// half-written entry. Time is read from [`tokio::time::Instant`], which
/// follows the paused clock in tests.
#[derive(Debug)]
pub struct ResponseCache {
    /// Key to entry.
    entries: DashMap<String, CacheEntry>,
    /// TTL used when the caller does not pass one.
    default_ttl: Duration,
}

impl ResponseCache {
    /// Create an empty cache with the given default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
        }
    }

    /// The TTL applied by [`Self::set_default`].
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Return the stored value if it is still fresh.
    ///
    /// An expired entry is removed before `None` is returned.
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = Instant::now();

        let fresh = match self.entries.get(key) {
            Some(entry) if entry.is_fresh(now) => Some(entry.value.clone()),
            Some(_) => None,
            None => return None,
        };

        if fresh.is_none() {
            // Only remove if still expired; a concurrent set may have replaced it.
            if self
                .entries
                .remove_if(key, |_, entry| !entry.is_fresh(now))
                .is_some()
            {
                debug!(key, "Evicted expired cache entry on read");
            }
        }

        fresh
    }

    /// Insert or overwrite `key`, stamped with the current time.
    pub fn set(&self, key: &str, value: Value, ttl: Duration) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Insert or overwrite `key` with the default TTL.
    pub fn set_default(&self, key: &str, value: Value) {
        self.set(key, value, self.default_ttl);
    }

    /// Remove `key`. Removing a missing key is a no-op.
    pub fn delete(&self, key: &str) {
        if self.entries.remove(key).is_some() {
            debug!(key, "Invalidated cache entry");
        }
    }

    /// Remove every key starting with `prefix`. Returns how many were removed.
    pub fn delete_prefix(&self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before.saturating_sub(self.entries.len());
        debug!(prefix, removed, "Invalidated cache entries by prefix");
        removed
    }

    /// Evict every expired entry in one pass. Returns how many were evicted.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now));
        before.saturating_sub(self.entries.len())
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
