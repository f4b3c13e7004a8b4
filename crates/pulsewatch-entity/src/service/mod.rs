//! Monitored service entities.

pub mod health;
pub mod model;

pub use health::{HealthCheck, HealthStatus};
pub use model::{MonitoredService, ServiceInput};
