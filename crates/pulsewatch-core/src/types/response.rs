//! The success envelope returned by the monitoring API.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::result::AppResult;

/// Standard API success body: `{ statusCode, status, message, data }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope {
    /// HTTP status echoed by the server.
    #[serde(default)]
    pub status_code: u16,
    /// Short status word (`"success"`).
    #[serde(default)]
    pub status: String,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Payload.
    #[serde(default)]
    pub data: Value,
}

impl ApiEnvelope {
    /// Interpret a successful response body.
    ///
    /// Bodies that are not shaped like an envelope are wrapped so that
    /// `data` always holds the payload. Envelope metadata is read
    /// leniently: a `null` or mistyped field falls back to its default
    /// and never costs the payload.
    pub fn from_body(status: u16, body: Value) -> Self {
        match body {
            Value::Object(mut map) if map.contains_key("data") || map.contains_key("statusCode") => {
                let status_code = map
                    .get("statusCode")
                    .and_then(|code| match code {
                        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
                        Value::String(s) => s.trim().parse().ok(),
                        _ => None,
                    })
                    .unwrap_or(status);
                let text = |map: &serde_json::Map<String, Value>, field: &str| {
                    map.get(field)
                        .and_then(Value::as_str)
                        .map(str::to_string)
                };

                Self {
                    status_code,
                    status: text(&map, "status").unwrap_or_else(|| "success".to_string()),
                    message: text(&map, "message").unwrap_or_default(),
                    data: map.remove("data").unwrap_or(Value::Null),
                }
            }
            body => Self {
                status_code: status,
                status: "success".to_string(),
                message: String::new(),
                data: body,
            },
        }
    }

    /// Deserialize `data` into a typed payload.
    pub fn data_as<T: DeserializeOwned>(&self) -> AppResult<T> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_full_envelope() {
        let body = json!({
            "statusCode": 200,
            "status": "success",
            "message": "Services fetched",
            "data": [{"id": 1}]
        });
        let envelope = ApiEnvelope::from_body(200, body);
        assert_eq!(envelope.message, "Services fetched");
        assert_eq!(envelope.data, json!([{"id": 1}]));
    }

    #[test]
    fn test_wraps_bare_payload() {
        let envelope = ApiEnvelope::from_body(201, json!({"id": "abc"}));
        assert_eq!(envelope.status_code, 201);
        assert_eq!(envelope.data, json!({"id": "abc"}));
    }

    #[test]
    fn test_null_message_keeps_payload() {
        let body = json!({"statusCode": 200, "status": "success", "message": null, "data": [1, 2]});
        let envelope = ApiEnvelope::from_body(200, body);
        assert_eq!(envelope.message, "");
        assert_eq!(envelope.data, json!([1, 2]));
    }

    #[test]
    fn test_string_status_code_keeps_payload() {
        let body = json!({"statusCode": "201", "status": null, "data": {"id": "abc"}});
        let envelope = ApiEnvelope::from_body(200, body);
        assert_eq!(envelope.status_code, 201);
        assert_eq!(envelope.status, "success");
        assert_eq!(envelope.data, json!({"id": "abc"}));

        let odd = ApiEnvelope::from_body(200, json!({"statusCode": "ok", "data": 5}));
        assert_eq!(odd.status_code, 200);
        assert_eq!(odd.data, json!(5));
    }
}
