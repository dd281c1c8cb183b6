//! Response envelope normalization.
//!
//! The backend is inconsistent about wrapping payloads. Any of these may come
//! back for the same resource:
//!
//! ```text
//! { "success": true, "data": <payload> }
//! { "data": <payload> }
//! { "items": [...] } / { "order": {...} } / { "user": {...} }
//! <payload>
//! ```
//!
//! [`decode`] tries the candidate payloads from most to least specific and
//! returns the first one that deserializes as `T`.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::ApiError;

/// Decode a payload from any supported envelope.
///
/// `wrappers` names the resource-specific keys to look under (for example
/// `["order"]`), both at the top level and inside `data`.
///
/// # Errors
///
/// Returns [`ApiError::UnexpectedResponse`] when no candidate matches, or
/// when the body explicitly reports `"success": false`.
pub fn decode<T: DeserializeOwned>(body: Value, wrappers: &[&str]) -> Result<T, ApiError> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("request was not successful");
        return Err(ApiError::UnexpectedResponse(message.to_owned()));
    }

    for candidate in candidates(&body, wrappers) {
        match serde_json::from_value::<T>(candidate.clone()) {
            Ok(payload) => return Ok(payload),
            Err(e) => debug!(error = %e, "Envelope candidate did not match"),
        }
    }

    Err(ApiError::UnexpectedResponse(preview(&body)))
}

fn candidates<'a>(body: &'a Value, wrappers: &[&str]) -> Vec<&'a Value> {
    let mut out = Vec::new();
    if let Some(data) = body.get("data").filter(|d| !d.is_null()) {
        out.extend(wrappers.iter().filter_map(|w| data.get(*w)));
        out.push(data);
    }
    out.extend(wrappers.iter().filter_map(|w| body.get(*w)));
    out.push(body);
    out
}

fn preview(body: &Value) -> String {
    body.to_string().chars().take(200).collect()
}
