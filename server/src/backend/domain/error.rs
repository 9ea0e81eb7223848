//! Errors returned by domain services.
//!
//! Storage code keeps returning `anyhow::Result`; services convert those
//! failures into [`DomainError::Storage`] with `?`, so the REST layer can
//! tell caller mistakes apart from server-side faults.

use crate::backend::domain::models::record::RecordValidationError;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Malformed or out-of-range input
    #[error("{0}")]
    Validation(String),
    /// Request conflicts with existing data (e.g. duplicate username)
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    /// Missing, invalid or expired credentials
    #[error("{0}")]
    Unauthorized(String),
    /// Authenticated but not allowed
    #[error("{0}")]
    Forbidden(String),
    /// Store access or other server-side failure. Never shown to callers.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        DomainError::NotFound(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        DomainError::Unauthorized(message.into())
    }
}

impl From<RecordValidationError> for DomainError {
    fn from(error: RecordValidationError) -> Self {
        DomainError::Validation(error.to_string())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
