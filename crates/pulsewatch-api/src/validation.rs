//! Pre-flight validation of mutation payloads.

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use pulsewatch_core::error::AppError;
use pulsewatch_core::result::AppResult;

/// Outcome of validating a raw payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationOutcome {
    /// Whether the payload conforms.
    pub success: bool,
    /// The normalized payload, present on success.
    pub data: Option<Value>,
    /// `field: message` entries, present on failure.
    pub errors: Vec<String>,
}

impl ValidationOutcome {
    /// A passing outcome carrying `data`.
    pub fn valid(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            errors: Vec::new(),
        }
    }

    /// A failing outcome.
    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            errors,
        }
    }

    /// The normalized payload, or a validation error listing every problem.
    pub fn into_result(self) -> AppResult<Value> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Ok(Value::Null),
            (false, _) => Err(AppError::validation(format!(
                "Validation failed: {}",
                self.errors.join("; ")
            ))),
        }
    }
}

/// A declarative shape a payload must satisfy.
pub trait Schema: Send + Sync {
    /// Check `raw` and return the normalized payload or the problems found.
    fn validate(&self, raw: &Value) -> ValidationOutcome;
}

/// Validate `raw` against `schema`.
pub fn validate(schema: &dyn Schema, raw: &Value) -> ValidationOutcome {
    schema.validate(raw)
}

/// Schema backed by a `serde` + `validator` type: the payload must
/// deserialize into `T` and pass `T::validate`. The normalized payload is
/// `T` serialized back, so unknown fields are dropped.
pub struct TypedSchema<T>(PhantomData<fn() -> T>);

impl<T> TypedSchema<T> {
    /// Create the schema.
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for TypedSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for TypedSchema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypedSchema<{}>", std::any::type_name::<T>())
    }
}

impl<T> Schema for TypedSchema<T>
where
    T: DeserializeOwned + Serialize + Validate,
{
    fn validate(&self, raw: &Value) -> ValidationOutcome {
        let parsed: T = match serde_json::from_value(raw.clone()) {
            Ok(parsed) => parsed,
            Err(e) => return ValidationOutcome::invalid(vec![format!("payload: {e}")]),
        };

        if let Err(errors) = parsed.validate() {
            let mut messages: Vec<String> = errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, field_errors)| {
                    field_errors
                        .iter()
                        .map(|error| {
                            let detail = error
                                .message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| error.code.to_string());
                            format!("{field}: {detail}")
                        })
                        .collect::<Vec<_>>()
                })
                .collect();
            if messages.is_empty() {
                messages.push(errors.to_string());
            }
            messages.sort();
            return ValidationOutcome::invalid(messages);
        }

        match serde_json::to_value(&parsed) {
            Ok(data) => ValidationOutcome::valid(data),
            Err(e) => ValidationOutcome::invalid(vec![format!("payload: {e}")]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsewatch_core::error::ErrorKind;
    use pulsewatch_entity::service::ServiceInput;
    use serde_json::json;

    #[test]
    fn test_valid_payload_is_normalized() {
        let schema = TypedSchema::<ServiceInput>::new();
        let outcome = validate(
            &schema,
            &json!({
                "name": "api",
                "url": "https://api.example.com/health",
                "intervalSeconds": 60,
                "unexpected": true
            }),
        );
        assert!(outcome.success);
        assert!(outcome.errors.is_empty());
        let data = outcome.data.unwrap();
        assert_eq!(data["name"], "api");
        assert!(data.get("unexpected").is_none());
    }

    #[test]
    fn test_field_errors_are_listed() {
        let schema = TypedSchema::<ServiceInput>::new();
        let outcome = validate(
            &schema,
            &json!({"name": "", "url": "not a url", "intervalSeconds": 5}),
        );
        assert!(!outcome.success);
        assert_eq!(outcome.data, None);
        assert_eq!(outcome.errors.len(), 3);
        assert!(outcome.errors.iter().any(|e| e.starts_with("name: ")));
        assert!(outcome.errors.iter().any(|e| e.starts_with("url: ")));
        assert!(outcome.errors.iter().any(|e| e.contains("between 30 and 86400")));
    }

    #[test]
    fn test_wrong_shape_fails() {
        let schema = TypedSchema::<ServiceInput>::new();
        let outcome = schema.validate(&json!("just a string"));
        assert!(!outcome.success);
        assert!(outcome.errors[0].starts_with("payload: "));
    }

    #[test]
    fn test_into_result() {
        let err = ValidationOutcome::invalid(vec!["name: required".into()])
            .into_result()
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("name: required"));

        let ok = ValidationOutcome::valid(json!({"a": 1})).into_result().unwrap();
        assert_eq!(ok, json!({"a": 1}));
    }
}
