//! API error types and the error envelope.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use yugen_core::error::{DomainError, FieldError};

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed.
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Tracing or exporter setup failed.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Machine-readable error code carried in the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed body, query or path, or a missing required parameter.
    BadRequest,
    /// Reserved for authentication in front of the API.
    Unauthorized,
    /// Reserved for authorization in front of the API.
    Forbidden,
    /// Unknown record, record of another novel, or unknown route.
    NotFound,
    /// The record failed validation; `details` lists the fields.
    ValidationError,
    /// Anything else.
    InternalError,
}

impl ErrorCode {
    /// The code reported for a response status.
    #[must_use]
    pub fn for_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::BadRequest,
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::FORBIDDEN => Self::Forbidden,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::UNPROCESSABLE_ENTITY => Self::ValidationError,
            _ => Self::InternalError,
        }
    }
}

/// The `error` object of a failed response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Per-field problems, omitted when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: ErrorBody,
}

/// HTTP-layer error that renders the failure envelope.
#[derive(Debug)]
pub enum ApiError {
    /// A failure reported by a handler.
    Domain(DomainError),
    /// The request could not be decoded (body, query string or path).
    BadRequest(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Domain(DomainError::MissingParameter(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Domain(DomainError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Domain(DomainError::Validation(_) | DomainError::InvalidToken { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Domain(DomainError::Infrastructure(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, details) = match self {
            Self::BadRequest(message) => (message, Vec::new()),
            Self::Domain(DomainError::Infrastructure(cause)) => {
                error!(%cause, "request failed on infrastructure error");
                ("internal server error".to_owned(), Vec::new())
            }
            Self::Domain(err) => (err.to_string(), err.details()),
        };

        let body = ErrorEnvelope {
            success: false,
            error: ErrorBody {
                code: ErrorCode::for_status(status),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}
