//! # pulsewatch-entity
//!
//! Domain models for the PulseWatch dashboard client. Every struct in this
//! crate is a wire object exchanged with the monitoring API or a value
//! object derived from one. Wire objects derive `Debug`, `Clone`,
//! `Serialize` and `Deserialize`; input objects additionally derive
//! `validator::Validate`.

pub mod analytics;
pub mod email;
pub mod permission;
pub mod service;
pub mod session;
pub mod settings;
pub mod user;
