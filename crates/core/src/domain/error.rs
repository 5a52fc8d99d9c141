// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Unexpected type for {field}: expected {expected}")]
    UnexpectedType { field: String, expected: String },

    #[error("Invalid flight id: {0}")]
    InvalidFlightId(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
