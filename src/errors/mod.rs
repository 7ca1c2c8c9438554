//! Error handling module for the alumni backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.
//! Malformed spreadsheet rows are never errors: the row mapper defaults and drops them.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const ALREADY_SUPPORTED: &str = "ALREADY_SUPPORTED";
    pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
    pub const NOT_CONFIGURED: &str = "NOT_CONFIGURED";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Login required or rejected
    #[error("UNAUTHORIZED: {0}")]
    Unauthorized(String),
    /// Resource not found
    #[error("NOT_FOUND: {0}")]
    NotFound(String),
    /// Invalid input, rejected before any transport call
    #[error("VALIDATION_ERROR: {0}")]
    Validation(String),
    /// The (request, user) pair already has a vote
    #[error("ALREADY_SUPPORTED: {0}")]
    DuplicateVote(String),
    /// Network or HTTP failure talking to the spreadsheet store
    #[error("TRANSPORT_ERROR: {0}")]
    Transport(String),
    /// The sheet needed for this operation has no spreadsheet id
    #[error("NOT_CONFIGURED: {0}")]
    NotConfigured(String),
    /// Internal server error
    #[error("INTERNAL_ERROR: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateVote(_) => StatusCode::CONFLICT,
            AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::DuplicateVote(_) => codes::ALREADY_SUPPORTED,
            AppError::Transport(_) => codes::TRANSPORT_ERROR,
            AppError::NotConfigured(_) => codes::NOT_CONFIGURED,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::DuplicateVote(msg)
            | AppError::Transport(msg)
            | AppError::NotConfigured(msg)
            | AppError::Internal(msg) => msg.clone(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Transport(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Sheets transport error: {:?}", err);
        AppError::Transport(format!("Sheets request failed: {}", err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_vote_is_distinct_from_transport() {
        let dup = AppError::DuplicateVote("You have already supported this request".into());
        assert_eq!(dup.status_code(), StatusCode::CONFLICT);
        assert_eq!(dup.error_code(), codes::ALREADY_SUPPORTED);
        assert!(!dup.is_transport());

        let transport = AppError::Transport("connection refused".into());
        assert_eq!(transport.status_code(), StatusCode::BAD_GATEWAY);
        assert!(transport.is_transport());
    }

    #[test]
    fn test_display_includes_code() {
        let err = AppError::Validation("Comment is required".into());
        assert_eq!(err.to_string(), "VALIDATION_ERROR: Comment is required");

        let dup = AppError::DuplicateVote("You have already supported this request".into());
        assert_eq!(
            dup.to_string(),
            "ALREADY_SUPPORTED: You have already supported this request"
        );
        assert_eq!(
            AppError::NotConfigured("no id".into()).to_string(),
            "NOT_CONFIGURED: no id"
        );
    }
}
