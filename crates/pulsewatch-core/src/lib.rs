//! # pulsewatch-core
//!
//! Core crate for the PulseWatch dashboard client. Contains the unified
//! error system, configuration schemas, the success envelope returned by
//! the monitoring API, and the persisted-storage trait.
//!
//! This crate has **no** internal dependencies on other PulseWatch crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
