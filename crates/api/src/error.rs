//! Error types for the Parley HTTP API server.

use axum::response::IntoResponse;
use thiserror::Error;

/// Main error type for API operations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Multipart form decoding error.
    #[error("Multipart error: {0}")]
    Multipart(String),

    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// No chat is open in the active session.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Core Parley error.
    #[error("Core error: {0}")]
    Core(#[from] parley_core::Error),
}

/// Result alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Convert to HTTP status code.
    pub fn status_code(&self) -> axum::http::StatusCode {
        match self {
            ApiError::Io(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Json(_) => axum::http::StatusCode::BAD_REQUEST,
            ApiError::Multipart(_) => axum::http::StatusCode::BAD_REQUEST,
            ApiError::InvalidRequest(_) => axum::http::StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => axum::http::StatusCode::NOT_FOUND,
            ApiError::InvalidState(_) => axum::http::StatusCode::CONFLICT,
            ApiError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Core(inner) => match inner {
                parley_core::Error::Validation(_) => axum::http::StatusCode::BAD_REQUEST,
                parley_core::Error::NotFound(_) => axum::http::StatusCode::NOT_FOUND,
                _ => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(error: axum::extract::multipart::MultipartError) -> Self {
        ApiError::Multipart(error.to_string())
    }
}

impl From<ApiError> for axum::response::Response {
    fn from(error: ApiError) -> Self {
        let status = error.status_code();
        let body = serde_json::json!({
            "error": error.to_string(),
            "code": status.as_u16(),
        });
        (status, axum::Json(body)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        self.into()
    }
}
