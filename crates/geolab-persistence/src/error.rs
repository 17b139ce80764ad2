//! Storage error types.

use std::path::PathBuf;

use thiserror::Error;

/// Local storage operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File I/O error.
    #[error("Failed to {operation} store entry: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete write of store entry")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored entry is not valid UTF-8.
    #[error("Store entry is not valid text: {path}")]
    InvalidText { path: PathBuf },

    /// A draft could not be serialized.
    #[error("Failed to serialize draft")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} local data at {}", operation, path.display()),
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save local data to {}. Please check disk space and permissions.",
                target_path.display()
            ),
            Self::InvalidText { path } => {
                format!("The local data at {} is corrupted.", path.display())
            }
            Self::Serialization(_) => "An error occurred while saving the draft.".to_string(),
        }
    }
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;
