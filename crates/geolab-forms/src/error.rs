//! Form controller errors.

use geolab_client::ApiError;
use geolab_model::ModelError;
use thiserror::Error;

/// Errors returned by form operations.
#[derive(Debug, Error)]
pub enum FormError {
    /// Required identity fields are blank.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// A save is already in flight for this form.
    #[error("a save is already in progress")]
    Busy,

    /// The remote service call failed.
    #[error(transparent)]
    Remote(#[from] ApiError),

    /// A value could not be applied to the record.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A navigation URL could not be parsed.
    #[error("invalid navigation URL: {0}")]
    InvalidUrl(String),
}

impl FormError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingFields(_) => "Complete sample code, work order and performed by.".to_string(),
            Self::Busy => "A save is already in progress.".to_string(),
            Self::Remote(e) => e.user_message(),
            Self::Model(e) => format!("Invalid value: {e}"),
            Self::InvalidUrl(url) => format!("The address '{url}' is not valid."),
        }
    }
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        Self::Model(ModelError::Json(err))
    }
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;
