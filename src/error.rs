use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::utils::{error_codes, error_to_api_response};

/// Failures reported by a backing-store repository
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A unique or foreign-key constraint rejected the write
    #[error("integrity conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() || db.is_foreign_key_violation() {
                return RepositoryError::Conflict(db.message().to_string());
            }
        }
        RepositoryError::Database(err)
    }
}

/// Errors surfaced by the entity services. Not-found is never an error here;
/// lookups return `None` or an empty list instead.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller-correctable: missing fields or an integrity conflict
    #[error("{0}")]
    Validation(String),
    #[error("backing store failure")]
    Internal(#[source] RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(msg) => {
                tracing::debug!("Integrity conflict rejected: {}", msg);
                ServiceError::Validation(format!("Integrity conflict: {}", msg))
            }
            other => ServiceError::Internal(other),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    InternalServerError,
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => AppError::BadRequest(msg),
            ServiceError::Internal(source) => {
                tracing::error!("Backing store failure: {:?}", source);
                AppError::InternalServerError
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, error_codes::NOT_FOUND, msg),
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
                "Something went wrong".to_string(),
            ),
        };

        (status, error_to_api_response::<()>(code, error_message)).into_response()
    }
}
