//! Convenience result type alias for PulseWatch.

use crate::error::AppError;

/// A specialized `Result` type for PulseWatch operations.
pub type AppResult<T> = Result<T, AppError>;
