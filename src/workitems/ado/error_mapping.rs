//! Error mapping helpers for the Azure DevOps REST store.

use http::StatusCode;

use crate::workitems::error::WorkItemError;

/// Checks if a status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> WorkItemError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    if is_auth_failure(status) {
        WorkItemError::Authentication {
            message: format!("{operation} failed: Azure DevOps returned {status} {message}"),
        }
    } else {
        WorkItemError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    }
}

pub(super) fn map_transport_error(operation: &str, error: &reqwest::Error) -> WorkItemError {
    if error.is_decode() {
        return WorkItemError::Decode {
            message: format!("{operation}: {error}"),
        };
    }
    WorkItemError::Network {
        message: format!("{operation} failed: {error}"),
    }
}

/// Extracts the `message` property from an Azure DevOps error body, falling
/// back to the raw body when it is not JSON.
pub(super) fn extract_ado_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) else {
        return Some(trimmed.to_owned());
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}
