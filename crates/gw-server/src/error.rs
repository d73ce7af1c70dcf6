//! Service error taxonomy
//!
//! Every service operation returns `Result<T, ServiceError>`. Each variant
//! belongs to exactly one [`ErrorKind`], and only the HTTP boundary
//! ([`IntoResponse`]) turns a kind into a status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::api::response::ErrorResponse;
use crate::db::DbError;

/// Result type alias for service operations
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Failure categories shared by every endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Caller is known but not allowed, or must be known and is not
    AccessForbidden,
    /// Record exists but the caller may not read it
    InaccessibleOrForbidden,
    RecordNotFound,
    RecordExists,
    ValidationError,
    AuthenticationError,
    ExternalServiceError,
    UnexpectedError,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::AccessForbidden => "ACCESS_FORBIDDEN",
            ErrorKind::InaccessibleOrForbidden => "INACCESSIBLE_OR_FORBIDDEN",
            ErrorKind::RecordNotFound => "RECORD_NOT_FOUND",
            ErrorKind::RecordExists => "RECORD_EXISTS",
            ErrorKind::ValidationError => "VALIDATION_ERROR",
            ErrorKind::AuthenticationError => "AUTHENTICATION_ERROR",
            ErrorKind::ExternalServiceError => "EXTERNAL_SERVICE_ERROR",
            ErrorKind::UnexpectedError => "UNEXPECTED_ERROR",
        }
    }

    /// Not-found and unreadable both answer 404 so that callers cannot probe
    /// for private ids.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::AccessForbidden => StatusCode::FORBIDDEN,
            ErrorKind::InaccessibleOrForbidden => StatusCode::NOT_FOUND,
            ErrorKind::RecordNotFound => StatusCode::NOT_FOUND,
            ErrorKind::RecordExists => StatusCode::CONFLICT,
            ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
            ErrorKind::AuthenticationError => StatusCode::UNAUTHORIZED,
            ErrorKind::ExternalServiceError => StatusCode::BAD_GATEWAY,
            ErrorKind::UnexpectedError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Forbidden")]
    AccessForbidden,

    #[error("Inaccessible or forbidden")]
    InaccessibleOrForbidden,

    #[error("{0}")]
    RecordNotFound(String),

    #[error("{0}")]
    RecordExists(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Authentication(String),

    #[error("External service error: {0}")]
    External(String),

    #[error("Database error: {0}")]
    Database(DbError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(resource: &str, identifier: impl std::fmt::Display) -> Self {
        Self::RecordNotFound(format!("{} '{}' not found", resource, identifier))
    }

    pub fn exists(resource: &str, identifier: impl std::fmt::Display) -> Self {
        Self::RecordExists(format!("{} '{}' already exists", resource, identifier))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::AccessForbidden => ErrorKind::AccessForbidden,
            ServiceError::InaccessibleOrForbidden => ErrorKind::InaccessibleOrForbidden,
            ServiceError::RecordNotFound(_) => ErrorKind::RecordNotFound,
            ServiceError::RecordExists(_) => ErrorKind::RecordExists,
            ServiceError::Validation(_) => ErrorKind::ValidationError,
            ServiceError::Authentication(_) => ErrorKind::AuthenticationError,
            ServiceError::External(_) => ErrorKind::ExternalServiceError,
            ServiceError::Database(_) | ServiceError::Internal(_) => ErrorKind::UnexpectedError,
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(msg) => ServiceError::RecordNotFound(msg),
            DbError::Duplicate(msg) => ServiceError::RecordExists(msg),
            other => ServiceError::Database(other),
        }
    }
}

impl From<gw_common::GwError> for ServiceError {
    fn from(err: gw_common::GwError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let message = match &self {
            ServiceError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "A database error occurred".to_string()
            },
            ServiceError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                "An internal error occurred".to_string()
            },
            ServiceError::External(msg) => {
                tracing::warn!(error = %msg, "External service error");
                self.to_string()
            },
            ServiceError::InaccessibleOrForbidden | ServiceError::RecordNotFound(_) => {
                tracing::debug!(kind = kind.code(), error = %self, "Record not returned");
                self.to_string()
            },
            _ => self.to_string(),
        };

        (kind.status(), Json(ErrorResponse::new(kind.code(), message))).into_response()
    }
}
