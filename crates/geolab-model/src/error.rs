//! Model error types.

use thiserror::Error;

/// Errors raised while turning external data into a report record.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The snapshot is not a JSON object.
    #[error("report snapshot must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    /// A single-field edit carried a value of the wrong shape.
    #[error("field {field} expects {expected}, found {found}")]
    FieldShape {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// The snapshot text is not valid JSON, or a field has an unusable shape.
    #[error("invalid report snapshot")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
