//! Error types for Parley web front-end serving.

use axum::response::IntoResponse;
use thiserror::Error;

/// Main error type for web operations.
#[derive(Error, Debug)]
pub enum WebError {
    /// Static file serving error.
    #[error("Static file error: {0}")]
    StaticFile(String),

    /// API error.
    #[error("API error: {0}")]
    Api(#[from] parley_api::ApiError),

    /// Core Parley error.
    #[error("Core error: {0}")]
    Core(#[from] parley_core::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result alias for web operations.
pub type WebResult<T> = Result<T, WebError>;

impl WebError {
    /// Convert to HTTP status code.
    pub fn status_code(&self) -> axum::http::StatusCode {
        match self {
            WebError::StaticFile(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            WebError::Api(e) => e.status_code(),
            WebError::Core(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            WebError::Io(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            WebError::Json(_) => axum::http::StatusCode::BAD_REQUEST,
            WebError::InvalidRequest(_) => axum::http::StatusCode::BAD_REQUEST,
        }
    }
}

impl From<WebError> for axum::response::Response {
    fn from(error: WebError) -> Self {
        let status = error.status_code();
        let body = serde_json::json!({
            "error": error.to_string(),
            "code": status.as_u16(),
        });
        (status, axum::Json(body)).into_response()
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        self.into()
    }
}
