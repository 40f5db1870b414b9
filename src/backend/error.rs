//! Backend error types and status mapping.

use crate::error::ErrorKind;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while talking to the backend REST API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request could not be sent or the response could not be read.
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend reported that the record does not exist.
    #[error("backend record not found: {0}")]
    NotFound(String),

    /// The backend refused the request because of conflicting state.
    #[error("backend reported a conflict: {0}")]
    Conflict(String),

    /// The backend refused the request payload.
    #[error("backend rejected the request: {0}")]
    Validation(String),

    /// Any other non-success response.
    #[error("backend error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Detail message or response body.
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl BackendError {
    /// Builds the error for a non-success status and its response body.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = detail_message(status, body);
        match status {
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            400 | 422 => Self::Validation(message),
            _ => Self::Api { status, message },
        }
    }

    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Transport(_) | Self::Api { .. } => ErrorKind::Network,
        }
    }
}

/// Extracts the `detail` field the backend puts on error bodies, falling
/// back to the raw body and then to the status code.
fn detail_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return match parsed.detail {
            serde_json::Value::String(detail) => detail,
            other => other.to_string(),
        };
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {status}")
    } else {
        trimmed.to_owned()
    }
}
