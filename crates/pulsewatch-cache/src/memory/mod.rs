//! In-memory response store.

pub mod store;

pub use store::{CacheEntry, ResponseCache};
