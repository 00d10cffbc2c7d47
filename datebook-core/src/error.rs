//! Error types for datebook.

use thiserror::Error;

/// Errors that can occur in datebook operations.
#[derive(Error, Debug)]
pub enum DatebookError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    /// One or more fields failed boundary validation.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A value could not be parsed into one of the closed domain types.
    #[error("Invalid {field}: '{value}'")]
    InvalidValue { field: &'static str, value: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl DatebookError {
    pub fn not_found(kind: &'static str, id: u64) -> Self {
        DatebookError::NotFound { kind, id }
    }

    pub fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        DatebookError::InvalidValue {
            field,
            value: value.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DatebookError::Validation(vec![message.into()])
    }

    /// Whether the caller can fix this error by changing its input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DatebookError::NotFound { .. }
                | DatebookError::Validation(_)
                | DatebookError::InvalidValue { .. }
        )
    }
}

/// Result type alias for datebook operations.
pub type DatebookResult<T> = Result<T, DatebookError>;
