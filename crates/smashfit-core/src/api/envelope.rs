//! The backend's `{success, data}` response envelope.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{ApiError, ApiResult};

/// Pulls a human-readable message out of an error body.
///
/// Tries `message`, then `error.message`, then `error` as a string. Short
/// plain-text bodies are used as-is; HTML error pages are ignored.
pub(crate) fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(json) = serde_json::from_str::<Value>(trimmed) {
        return message_from_json(&json);
    }

    if trimmed.starts_with('<') || trimmed.len() > 200 {
        return None;
    }
    Some(trimmed.to_string())
}

fn message_from_json(json: &Value) -> Option<String> {
    let non_empty = |v: &Value| {
        v.as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    json.get("message")
        .and_then(non_empty)
        .or_else(|| {
            json.get("error")
                .and_then(|e| e.get("message"))
                .and_then(non_empty)
        })
        .or_else(|| json.get("error").and_then(non_empty))
}

/// Unwraps the envelope of a successful response.
///
/// - `{success: false, ...}` becomes [`ApiError::Rejected`].
/// - `{success: true, data}` yields `data`.
/// - `{success: true}` without `data` yields the whole object (login-style
///   payloads put `token` and `user` next to `success`).
/// - Bodies without an envelope pass through unchanged.
pub fn unwrap_envelope(body: Value) -> ApiResult<Value> {
    let Some(success) = body.get("success").and_then(Value::as_bool) else {
        return Ok(body);
    };

    if !success {
        return Err(ApiError::Rejected {
            message: message_from_json(&body),
        });
    }

    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) => Ok(data),
            None => Ok(Value::Object(map)),
        },
        other => Ok(other),
    }
}

/// Decodes an unwrapped payload into a typed value.
pub fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}
