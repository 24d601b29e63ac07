//! Optional-field accessors over provider JSON payloads.

use crate::error::{SocialError, SocialResult};
use serde_json::Value;

/// Rejects error-shaped payloads. Must run before any field extraction.
///
/// Any object carrying an `error` key is treated as a failure; the message
/// prefers `error_description`, then `message`, then the `error` value itself.
pub fn check_response(payload: &Value) -> SocialResult<()> {
    let Some(error) = payload.get("error") else {
        return Ok(());
    };

    let code = scalar_string(error);
    let message = str_field(payload, "error_description")
        .or_else(|| str_field(payload, "message"))
        .or_else(|| code.clone())
        .unwrap_or_else(|| "Unknown provider error".to_string());

    Err(SocialError::ProviderError { code, message })
}

/// Non-empty string at `key`; numbers are stringified.
pub fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(scalar_string)
}

/// Non-negative integer at `key`, accepting numeric strings.
pub fn u64_field(value: &Value, key: &str) -> Option<u64> {
    match value.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Follows `path` through nested objects.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}

pub fn first_element(value: &Value) -> Option<&Value> {
    value.as_array().and_then(|items| items.first())
}

pub fn last_element(value: &Value) -> Option<&Value> {
    value.as_array().and_then(|items| items.last())
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
