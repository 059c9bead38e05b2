//! Error handling for the API server

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Failed to read prompts file: {0}")]
    ReadFailed(String),

    #[error("Invalid JSON in prompts file: {0}")]
    CorruptStore(String),

    #[error("Failed to save prompts: {0}")]
    SaveFailed(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::ReadFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read prompts file".to_string(),
            ),
            ApiError::CorruptStore(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid JSON in prompts file".to_string(),
            ),
            ApiError::SaveFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save prompts".to_string(),
            ),
            ApiError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, self.to_string())
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string()),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<promptdeck::PromptdeckError> for ApiError {
    fn from(e: promptdeck::PromptdeckError) -> Self {
        use promptdeck::PromptdeckError;

        match e {
            PromptdeckError::MalformedPersistedData { reason } => Self::CorruptStore(reason),
            PromptdeckError::PersistFailure { reason } => Self::SaveFailed(reason),
            other => Self::ReadFailed(other.to_string()),
        }
    }
}

impl ApiError {
    pub fn bad_request(msg: &str) -> Self {
        Self::BadRequest(msg.to_string())
    }
}
