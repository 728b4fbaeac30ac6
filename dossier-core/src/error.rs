use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reqwest::Method;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    /// No bearer token where one is required. Raised before any network call.
    #[error("Session expired. Please sign in again.")]
    NoSession,

    #[error("{method} {path} -> {status}: {message}")]
    Upstream {
        status: StatusCode,
        method: Method,
        path: String,
        message: String,
    },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("No compatible API endpoint was found")]
    NoCandidates,

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Session store error: {0}")]
    Session(String),

    #[error("Export failed: {0}")]
    Export(String),
}

impl ConsoleError {
    /// Status reported by the backend, if the failure came from one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ConsoleError::Upstream { status, .. } => Some(*status),
            ConsoleError::Transport(err) => err.status(),
            _ => None,
        }
    }

    /// 404/405: the backend variant does not expose this shape at that path.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::NOT_FOUND) | Some(StatusCode::METHOD_NOT_ALLOWED)
        )
    }

    /// Human readable message for inline display.
    pub fn display_text(&self) -> String {
        match self {
            ConsoleError::Upstream { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Extracts a readable message from a backend error body.
///
/// Accepts plain text, a JSON string, or an object carrying `message` or
/// `error`. Falls back to the canonical reason of `status`.
pub fn error_to_text(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    let fallback = || {
        status
            .canonical_reason()
            .unwrap_or("Unexpected error")
            .to_string()
    };

    if trimmed.is_empty() {
        return fallback();
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(serde_json::Value::Object(map)) => ["message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
            .unwrap_or_else(|| trimmed.to_string()),
        Ok(_) => trimmed.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
        }

        let (status, error_message, details) = match &self {
            ConsoleError::NoSession => (StatusCode::UNAUTHORIZED, self.to_string(), None),
            ConsoleError::Upstream {
                status, message, ..
            } => {
                // 4xx are the caller's problem and pass through; backend faults become 502.
                let mapped = if status.is_client_error() {
                    *status
                } else {
                    StatusCode::BAD_GATEWAY
                };
                (mapped, message.clone(), Some(self.to_string()))
            }
            ConsoleError::Transport(err) => (
                StatusCode::BAD_GATEWAY,
                "Backend unreachable".to_string(),
                Some(err.to_string()),
            ),
            ConsoleError::NoCandidates | ConsoleError::Decode(_) => {
                (StatusCode::BAD_GATEWAY, self.to_string(), None)
            }
            ConsoleError::Validation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation error".to_string(),
                Some(err.to_string()),
            ),
            ConsoleError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            ConsoleError::Session(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Session error".to_string(),
                Some(msg.clone()),
            ),
            ConsoleError::Export(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Export error".to_string(),
                Some(msg.clone()),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: error_message,
                details,
            }),
        )
            .into_response()
    }
}
