//! Error types for Starport core.

use std::{error::Error, fmt};

/// Error type for Starport core operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StarportError {
    /// Malformed or out-of-range input.
    Validation(String),
    /// The requested ship does not exist.
    NotFound,
    /// An error surfaced by the storage collaborator.
    Storage(String),
}

impl fmt::Display for StarportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "validation error: {message}"),
            Self::NotFound => write!(f, "ship not found"),
            Self::Storage(message) => write!(f, "storage error: {message}"),
        }
    }
}

impl Error for StarportError {}

/// Convenience result type for Starport core.
pub type Result<T> = std::result::Result<T, StarportError>;
