use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Offset or limit outside the accepted range. Caller error, not retried.
    #[error("Invalid page request: {0}")]
    InvalidPageRequest(String),

    /// The record store failed. Callers may retry with backoff.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Not found")]
    NotFound,

    #[error("Type constraint violation: {0}")]
    TypeConstraint(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}
