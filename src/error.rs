//! Error types for Cruddy
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using TodoError
pub type Result<T> = std::result::Result<T, TodoError>;

/// Unified error type for Cruddy operations
#[derive(Debug, Error)]
pub enum TodoError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("No item with id: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // -------------------------------------------------------------------------
    // Counter Errors
    // -------------------------------------------------------------------------
    #[error("Counter file {path:?} is unusable: {reason}")]
    CounterCorrupt { path: PathBuf, reason: String },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Server error: {0}")]
    Remote(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TodoError {
    /// True when the error means "record id does not exist"
    pub fn is_not_found(&self) -> bool {
        matches!(self, TodoError::NotFound(_))
    }

    /// True when the error is an underlying storage failure
    /// (anything on disk that is not explained by a missing record)
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            TodoError::Io(_) | TodoError::Storage(_) | TodoError::CounterCorrupt { .. }
        )
    }
}

impl From<bincode::Error> for TodoError {
    fn from(e: bincode::Error) -> Self {
        TodoError::Serialization(e.to_string())
    }
}
