//! Handler errors and their JSON bodies.
//!
//! ```text
//! ValidationError::Duplicate ─┐
//! DbError::UniqueViolation ───┴─► 409 CONFLICT
//! ValidationError::*  ───────────► 400 VALIDATION_ERROR
//! DbError::NotFound   ───────────► 404 NOT_FOUND
//! other DbError       ───────────► 500 DATABASE_ERROR  (detail goes to the log)
//! AuthUser rejection  ───────────► 401 UNAUTHORIZED
//! ```
//!
//! The coach proxy is the one route that does not use this type; it answers
//! with `{ "error": "..." }` instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use finsense_core::{CoreError, ValidationError};
use finsense_db::DbError;
use serde::Serialize;

/// Body of every failed non-coach request:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Budget not found: 7f9c..."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: ErrorCode,
    /// Shown to the user as is.
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    /// Second budget for a category.
    Conflict,
    Unauthorized,
    DatabaseError,
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// "Goal not found: <id>"
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        let message = match &err {
            DbError::NotFound { entity, id } => return ApiError::not_found(entity, id),
            DbError::UniqueViolation { field, value } => {
                return ApiError::new(
                    ErrorCode::Conflict,
                    format!("{} '{}' already exists", field, value),
                )
            }
            DbError::ForeignKeyViolation { .. } => {
                tracing::warn!(error = %err, "Rejected dangling reference");
                return ApiError::validation("Invalid reference");
            }
            DbError::ConnectionFailed(_) => "Database unavailable",
            DbError::MigrationFailed(_) => "Database schema is out of date",
            DbError::PoolExhausted => "Database busy, try again",
            DbError::QueryFailed(_) | DbError::TransactionFailed(_) | DbError::Internal(_) => {
                "Database operation failed"
            }
        };
        tracing::error!(error = %err, "Store error");
        ApiError::new(ErrorCode::DatabaseError, message)
    }
}

/// Duplicates are conflicts, everything else is a bad request.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Duplicate { .. } => {
                ApiError::new(ErrorCode::Conflict, err.to_string())
            }
            other => ApiError::validation(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => e.into(),
            CoreError::InvalidExchangeState { .. } => ApiError::new(ErrorCode::Conflict, err.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
