//! API error types
//!
//! Two error body shapes, matching what the dashboard front end expects:
//! card reads answer `{"error": ...}`, write paths answer
//! `{"success": false, "message": ...}` (with partial stats for demo
//! generation).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use beacon_demo::GenerationStats;

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad or missing card id on the card endpoint
    #[error("{0}")]
    Card(String),

    /// Request payload failed validation
    #[error("{0}")]
    BadRequest(String),

    /// A downstream store rejected a write-path operation
    #[error("{0}")]
    Upstream(String),

    /// Demo generation failed partway
    #[error("{message}")]
    DemoFailed {
        /// What went wrong
        message: String,
        /// What was written before the failure
        partial: GenerationStats,
    },
}

impl ApiError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Card(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) | Self::DemoFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        tracing::warn!(status = %status, error = %self, "API error");

        let body = match &self {
            ApiError::Card(message) => json!({ "error": message }),
            ApiError::BadRequest(message) | ApiError::Upstream(message) => {
                json!({ "success": false, "message": message })
            }
            ApiError::DemoFailed { message, partial } => {
                json!({ "success": false, "message": message, "stats": partial })
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type Result<T> = std::result::Result<T, ApiError>;
