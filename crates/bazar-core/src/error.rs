//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Active listing limit reached: {current} of {limit}")]
    QuotaExceeded { current: u64, limit: u64 },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Operation requires listing ownership")]
    NotOwner,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Active listing limit reached: {current} of {limit}")]
    QuotaExceeded { current: u64, limit: u64 },
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::QuotaExceeded { current, limit } => {
                DomainError::QuotaExceeded { current, limit }
            }
            RepoError::NotFound => DomainError::Internal("entity not found".to_string()),
            other => DomainError::Internal(other.to_string()),
        }
    }
}
