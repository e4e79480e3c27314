/// Response envelope handling for the analysis backend.
///
/// Every endpoint answers `{status, message?, data?}`. A call succeeds only
/// when the HTTP status is 2xx, the body parses as JSON and `status` is the
/// literal `"success"`; all other outcomes collapse into
/// [`DashboardError::RequestFailed`] carrying the body's `message` when one
/// was sent.
use serde_json::Value;

use crate::error::DashboardError;

/// The literal `status` value that marks a successful response.
pub const SUCCESS_STATUS: &str = "success";

/// Validate an envelope and return its `data` payload (`Null` when absent).
pub fn open_envelope(
    http_status: u16,
    body: &str,
    default_message: &str,
) -> Result<Value, DashboardError> {
    let Ok(mut parsed) = serde_json::from_str::<Value>(body) else {
        return Err(DashboardError::RequestFailed(default_message.to_string()));
    };

    let message = || {
        parsed
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(default_message)
            .to_string()
    };

    if !(200..300).contains(&http_status) {
        return Err(DashboardError::RequestFailed(message()));
    }

    if parsed.get("status").and_then(Value::as_str) != Some(SUCCESS_STATUS) {
        return Err(DashboardError::RequestFailed(message()));
    }

    Ok(parsed
        .get_mut("data")
        .map(Value::take)
        .unwrap_or(Value::Null))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
