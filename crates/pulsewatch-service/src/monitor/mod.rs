//! Capability-guarded dashboard operations.

pub mod service;

pub use service::MonitorService;
