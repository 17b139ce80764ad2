//! Messages exchanged with an embedding host page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message to or from the host that embeds the form.
///
/// Serialized as a JSON object tagged by `type`, e.g.
/// `{"type": "TOKEN_REFRESH", "token": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FrameMessage {
    /// Host to form: a fresh bearer token.
    #[serde(rename = "TOKEN_REFRESH")]
    TokenRefresh { token: String },
    /// Form to host: please send a fresh token.
    #[serde(rename = "TOKEN_REFRESH_REQUEST")]
    TokenRefreshRequest,
    /// Form to host: the form is done, close its modal.
    #[serde(rename = "CLOSE_MODAL")]
    CloseModal,
}

impl FrameMessage {
    /// Interprets an incoming message.
    ///
    /// Unknown tags, malformed bodies and token refreshes without a token
    /// yield `None`.
    pub fn parse(value: &Value) -> Option<Self> {
        match Self::deserialize(value) {
            Ok(Self::TokenRefresh { token }) if token.trim().is_empty() => None,
            Ok(message) => Some(message),
            Err(e) => {
                tracing::trace!(error = %e, "ignoring host message");
                None
            }
        }
    }

    /// Parses message text; see [`FrameMessage::parse`].
    pub fn parse_str(text: &str) -> Option<Self> {
        serde_json::from_str::<Value>(text)
            .ok()
            .and_then(|value| Self::parse(&value))
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wire_format() {
        assert_eq!(FrameMessage::CloseModal.to_json(), json!({"type": "CLOSE_MODAL"}));
        assert_eq!(
            FrameMessage::parse(&json!({"type": "TOKEN_REFRESH", "token": "t1"})),
            Some(FrameMessage::TokenRefresh {
                token: "t1".to_string()
            })
        );
    }

    #[test]
    fn unknown_and_empty_messages_are_ignored() {
        assert_eq!(FrameMessage::parse(&json!({"type": "RESIZE", "h": 10})), None);
        assert_eq!(FrameMessage::parse(&json!({"type": "TOKEN_REFRESH", "token": ""})), None);
        assert_eq!(FrameMessage::parse(&json!({"type": "TOKEN_REFRESH"})), None);
        assert_eq!(FrameMessage::parse(&json!("CLOSE_MODAL")), None);
        assert_eq!(FrameMessage::parse_str("not json"), None);
    }
}
