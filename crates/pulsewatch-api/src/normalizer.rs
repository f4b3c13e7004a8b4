//! Maps transport outcomes to one user-facing message and an `AppError`.
//!
//! Message precedence for a received response:
//! 1. a non-empty `message` field,
//! 2. a non-empty `error` field,
//! 3. a non-empty scalar body (strings verbatim, numbers and `true` as text),
//! 4. [`SERVICE_FAILED`].
//!
//! When nothing was received the message is [`SERVICE_UNAVAILABLE`].

use serde_json::Value;
use tracing::warn;

use pulsewatch_core::error::{AppError, ErrorKind};

use crate::transport::{TransportFailure, TransportResponse};

/// Fallback when a response arrived but carried nothing usable.
pub const SERVICE_FAILED: &str = "Service failed";
/// Fallback when no response arrived at all.
pub const SERVICE_UNAVAILABLE: &str = "Service unavailable";

/// The single human-readable message shown for a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedError {
    /// Non-empty user-facing message.
    pub message: String,
}

impl std::fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Stateless failure normalizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorNormalizer;

impl ErrorNormalizer {
    /// Normalize a failure. `body` is `None` when no response was received.
    pub fn normalize(body: Option<&Value>) -> NormalizedError {
        let message = match body {
            None => SERVICE_UNAVAILABLE.to_string(),
            Some(body) => Self::field_text(body, "message")
                .or_else(|| Self::field_text(body, "error"))
                .or_else(|| Self::scalar_text(body))
                .unwrap_or_else(|| SERVICE_FAILED.to_string()),
        };
        NormalizedError { message }
    }

    /// Error for a received non-2xx response.
    ///
    /// 401 maps to [`ErrorKind::Authentication`], everything else to
    /// [`ErrorKind::Server`]. The status is attached either way.
    pub fn classify(response: &TransportResponse) -> AppError {
        let normalized = Self::normalize(Some(&response.body));
        let kind = match response.status {
            401 => ErrorKind::Authentication,
            _ => ErrorKind::Server,
        };
        AppError::new(kind, normalized.message).with_status(response.status)
    }

    /// Error for a request that received no response.
    pub fn network(failure: &TransportFailure) -> AppError {
        warn!(error = %failure, "Request failed without a response");
        AppError::network(Self::normalize(None).message)
    }

    /// Non-empty text of a top-level field. Nested objects and arrays
    /// under the field are not rendered.
    fn field_text(body: &Value, field: &str) -> Option<String> {
        body.as_object()
            .and_then(|map| map.get(field))
            .and_then(Self::scalar_text)
    }

    fn scalar_text(value: &Value) -> Option<String> {
        match value {
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            Value::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            _ => None,
        }
    }
}
