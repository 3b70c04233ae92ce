use thiserror::Error;

use crate::error::StoreError;

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Registration rejected: {}", .0.join("; "))]
    ValidationError(Vec<String>),
    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
