//! # pulsewatch-service
//!
//! Application-level use cases for the PulseWatch dashboard client.
//!
//! - [`SessionController`] drives the login/refresh/logout state machine
//!   over the token vault and reacts to rejected credentials.
//! - [`MonitorService`] exposes the dashboard operations, each guarded by
//!   the capability the current role must hold.
//!
//! Services follow constructor injection: every dependency is handed in at
//! construction time.

pub mod monitor;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use monitor::MonitorService;
pub use session::SessionController;
