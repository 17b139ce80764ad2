//! Error types for remote API calls.

use thiserror::Error;

/// Errors returned by [`crate::RemoteSync`] operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The server rejected the bearer token.
    #[error("session expired or unauthorized")]
    Unauthorized,

    /// The server answered with a non-success status.
    #[error("server error ({status}){}", detail_suffix(.detail))]
    Http { status: u16, detail: Option<String> },

    /// Request failed before a response arrived.
    #[error("network error: {0}")]
    Network(String),

    /// Response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The configured base URL is unusable.
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Message suitable for showing to the user.
    ///
    /// A server-provided `detail` is shown verbatim.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            Self::Http {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Http { status, .. } => format!("The server rejected the request ({status})."),
            Self::Network(_) => {
                "Could not reach the server. Please check your connection.".to_string()
            }
            Self::Decode(_) => "The server sent an unexpected response.".to_string(),
            Self::InvalidUrl(url) => format!("The API address '{url}' is not valid."),
        }
    }

    /// Returns whether retrying the same request might succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_is_shown_verbatim() {
        let err = ApiError::Http {
            status: 422,
            detail: Some("numero_ot duplicado".to_string()),
        };
        assert_eq!(err.user_message(), "numero_ot duplicado");
        assert_eq!(err.to_string(), "server error (422): numero_ot duplicado");
    }

    #[test]
    fn test_retryable() {
        assert!(ApiError::Network("timeout".to_string()).is_retryable());
        assert!(
            ApiError::Http {
                status: 503,
                detail: None
            }
            .is_retryable()
        );
        assert!(!ApiError::Unauthorized.is_retryable());
    }
}
