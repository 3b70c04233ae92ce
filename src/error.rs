use std::fmt;

use thiserror::Error;

use crate::collection::RecordId;

/// How an operation addressed the record it could not find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRef {
    Index(usize),
    Id(RecordId),
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Index(index) => write!(f, "index {}", index),
            RecordRef::Id(id) => write!(f, "id {}", id),
        }
    }
}

/// Errors surfaced by the key-value medium and the collection layer on top of it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Corrupt data under '{key}': {reason}")]
    CorruptData { key: String, reason: String },
    #[error("No record at {target} in '{key}'")]
    NotFound { key: String, target: RecordRef },
    #[error("'{key}' changed since it was read")]
    Stale { key: String },
    #[error("Invalid record for '{key}': {reason}")]
    Validation { key: String, reason: String },
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
    #[error("Storage I/O error: {0}")]
    Io(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl StoreError {
    pub(crate) fn corrupt(key: &str, reason: impl fmt::Display) -> Self {
        StoreError::CorruptData {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn not_found(key: &str, target: RecordRef) -> Self {
        StoreError::NotFound {
            key: key.to_string(),
            target,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}
