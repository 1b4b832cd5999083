//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::scheduler::SchedulingError;
use crate::services::ServiceError;

/// API error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request; `code` distinguishes range, constraint and validation failures
    BadRequest { code: &'static str, message: String },
    /// Missing or unknown caller identity
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: "BAD_REQUEST",
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, ApiError::new(code, message))
            }
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, ApiError::new("UNAUTHORIZED", msg))
            }
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, ApiError::new("FORBIDDEN", msg)),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ApiError::new("CONFLICT", msg)),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", "internal server error").with_details(msg),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        let code = match err {
            SchedulingError::InvalidRange { .. } => "INVALID_RANGE",
            SchedulingError::InvalidConstraint(_) => "INVALID_CONSTRAINT",
        };
        AppError::BadRequest {
            code,
            message: err.to_string(),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Forbidden(msg) => AppError::Forbidden(msg),
            ServiceError::NotFound(msg) => AppError::NotFound(msg),
            ServiceError::Conflict(msg) => AppError::Conflict(msg),
            ServiceError::Validation(message) => AppError::BadRequest {
                code: "VALIDATION_ERROR",
                message,
            },
            ServiceError::Scheduling(e) => e.into(),
            ServiceError::Repository(e) => {
                tracing::error!(error = %e, "repository failure");
                AppError::Internal(e.to_string())
            }
        }
    }
}
