//! # pulsewatch-cache
//!
//! Client-side response caching for PulseWatch:
//!
//! - **memory**: TTL-keyed [`ResponseCache`] with lazy eviction on read
//! - **dedup**: [`RequestDeduplicator`], one in-flight operation per key
//! - **sweeper**: background task that evicts expired entries on a fixed interval
//!
//! [`ApiCache`] owns all three and is the single process-wide instance
//! handed to every consumer.

pub mod dedup;
pub mod keys;
pub mod memory;
pub mod provider;
pub mod sweeper;

pub use dedup::RequestDeduplicator;
pub use memory::{CacheEntry, ResponseCache};
pub use provider::ApiCache;
