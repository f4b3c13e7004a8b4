//! Periodic eviction of expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::memory::ResponseCache;

/// Spawn the sweep loop.
///
/// Every `interval` the loop runs one synchronous [`ResponseCache::sweep`]
/// pass, bounding memory for keys that are never read again. The loop ends
/// when `shutdown` flips to `true` or its sender is dropped.
pub fn spawn_sweeper(
    cache: Arc<ResponseCache>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let evicted = cache.sweep();
                    if evicted > 0 {
                        debug!(evicted, remaining = cache.len(), "Cache sweep evicted expired entries");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Cache sweeper stopped");
    })
}
