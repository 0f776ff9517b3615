//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use bazar_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    Forbidden,
    Conflict(String),
    QuotaExceeded { current: u64, limit: u64 },
    TooManyRequests,
    Upstream(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::QuotaExceeded { current, limit } => {
                write!(f, "Quota exceeded: {} of {}", current, limit)
            }
            AppError::TooManyRequests => write!(f, "Too many requests"),
            AppError::Upstream(msg) => write!(f, "Upstream failure: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::QuotaExceeded { .. } => StatusCode::FORBIDDEN,
            AppError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized => ErrorResponse::unauthorized(),
            AppError::Forbidden => ErrorResponse::forbidden(),
            AppError::Conflict(detail) => ErrorResponse::new(409, "Conflict").with_detail(detail),
            AppError::QuotaExceeded { current, limit } => {
                ErrorResponse::new(403, "Quota Exceeded").with_detail(format!(
                    "Active listing limit reached: {current} of {limit}. Upgrade your plan to post more."
                ))
            }
            AppError::TooManyRequests => ErrorResponse::too_many_requests(),
            AppError::Upstream(detail) => {
                tracing::warn!("Upstream failure: {}", detail);
                ErrorResponse::new(502, "Upstream Failure")
                    .with_detail("A dependent service failed. Please try again.")
            }
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<bazar_core::error::DomainError> for AppError {
    fn from(err: bazar_core::error::DomainError) -> Self {
        use bazar_core::error::DomainError;
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::QuotaExceeded { current, limit } => {
                AppError::QuotaExceeded { current, limit }
            }
            DomainError::InvalidTransition { from, to } => {
                AppError::Conflict(format!("Cannot change listing from {} to {}", from, to))
            }
            DomainError::Unauthorized => AppError::Unauthorized,
            DomainError::NotOwner => AppError::Forbidden,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<bazar_core::error::RepoError> for AppError {
    fn from(err: bazar_core::error::RepoError) -> Self {
        use bazar_core::error::RepoError;
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::QuotaExceeded { current, limit } => {
                AppError::QuotaExceeded { current, limit }
            }
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<bazar_core::ports::BlobError> for AppError {
    fn from(err: bazar_core::ports::BlobError) -> Self {
        use bazar_core::ports::BlobError;
        match err {
            BlobError::InvalidPath(path) => AppError::BadRequest(format!("Invalid path: {path}")),
            BlobError::Io(msg) => {
                tracing::error!("Blob storage error: {}", msg);
                AppError::Upstream("Storage failure".to_string())
            }
        }
    }
}

impl From<bazar_core::ports::LookupError> for AppError {
    fn from(err: bazar_core::ports::LookupError) -> Self {
        use bazar_core::ports::LookupError;
        match err {
            LookupError::Malformed(cep) => {
                AppError::BadRequest(format!("Malformed postal code: {cep}"))
            }
            LookupError::Timeout => AppError::Upstream("Postal lookup timed out".to_string()),
            LookupError::Upstream(msg) => AppError::Upstream(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
