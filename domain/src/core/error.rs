//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid storage key: {0}")]
    InvalidStorageKey(String),

    #[error("Invalid signal name: {0}")]
    InvalidSignalName(String),

    #[error("Invalid origin: {0}")]
    InvalidOrigin(String),
}

impl DomainError {
    /// The rejected input carried by this error
    pub fn rejected_value(&self) -> &str {
        match self {
            DomainError::InvalidStorageKey(v)
            | DomainError::InvalidSignalName(v)
            | DomainError::InvalidOrigin(v) => v,
        }
    }
}
