//! Typed errors returned by the vendor API clients.

use serde_json::Value;
use thiserror::Error;

/// A failed call against Google Play or App Store Connect.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The vendor answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[from] wreq::Error),

    /// The response body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Builds a status error, pulling the human-readable message out of the
    /// vendor's error envelope when there is one.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| body.trim().to_string());
        ApiError::Status { status, message }
    }

    /// HTTP status, if the vendor responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Vendor message or the underlying error text.
    pub fn message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            ApiError::Status { status, message } => {
                *status == 404 || message.to_lowercase().contains("not found")
            }
            _ => false,
        }
    }

    pub fn is_already_exists(&self) -> bool {
        match self {
            ApiError::Status { status, message } => {
                *status == 409 || message.to_lowercase().contains("already exists")
            }
            _ => false,
        }
    }

    /// 4xx responses: the request was understood and refused.
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(400..=499))
    }
}

/// Google wraps errors as `{"error": {"message": ..}}`, App Store Connect as
/// JSON:API `{"errors": [{"detail": ..}]}`.
fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    if let Some(message) = value.pointer("/error/message").and_then(Value::as_str) {
        return Some(message.to_string());
    }

    let first = value.pointer("/errors/0")?;
    first
        .get("detail")
        .or_else(|| first.get("title"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
