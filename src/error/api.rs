//! Backend API errors.
//!
//! The facade folds transport, protocol and decode failures into
//! [`ApiError`], whose `Display` output is the one message shown to users.

use thiserror::Error;

use crate::traits::{HttpError, Response};

/// Result alias for facade operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// A normalized backend failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request never reached the backend or never returned.
    #[error("{0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Protocol { status: u16, message: String },

    /// The response body could not be decoded into the expected schema.
    #[error("Invalid response from server: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build a protocol error from a non-2xx response.
    ///
    /// Uses the JSON `detail` field when present and non-empty, otherwise
    /// falls back to `HTTP <status>`.
    pub fn from_response(response: &Response) -> Self {
        let message = response
            .json::<serde_json::Value>()
            .ok()
            .and_then(|body| body.get("detail").cloned())
            .and_then(|detail| match detail {
                serde_json::Value::Null => None,
                serde_json::Value::String(text) if text.is_empty() => None,
                serde_json::Value::String(text) => Some(text),
                // FastAPI validation errors carry a structured detail
                other => Some(other.to_string()),
            })
            .unwrap_or_else(|| format!("HTTP {}", response.status));

        ApiError::Protocol {
            status: response.status,
            message,
        }
    }

    /// HTTP status for protocol errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Protocol { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
