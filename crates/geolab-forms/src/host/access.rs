//! Access gate: decides whether the form may be shown.

use geolab_persistence::TokenStore;

use super::NavigationContext;

/// Login page users are sent to when access is denied.
pub const DEFAULT_CRM_LOGIN_URL: &str = "http://localhost:3000/login";

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Access denied; the user should sign in at `login_url`.
    Denied { login_url: String },
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Grants access when the form was opened with a token, or when it is
/// embedded and a token is already stored.
#[derive(Debug, Clone)]
pub struct AccessGate {
    tokens: TokenStore,
    login_url: String,
}

impl AccessGate {
    pub fn new(tokens: TokenStore, login_url: impl Into<String>) -> Self {
        Self {
            tokens,
            login_url: login_url.into(),
        }
    }

    /// Checks access for `context`. A token in the context is persisted
    /// first, so later requests use it.
    pub fn check(&self, context: &NavigationContext, embedded: bool) -> Access {
        if let Some(token) = &context.token {
            if let Err(e) = self.tokens.set_token(token) {
                tracing::warn!(error = %e, "failed to persist session token");
            }
            tracing::debug!("access granted by navigation token");
            return Access::Granted;
        }

        if embedded && self.tokens.token().is_some() {
            tracing::debug!("access granted by stored token");
            return Access::Granted;
        }

        tracing::warn!(embedded, "access denied");
        Access::Denied {
            login_url: self.login_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use geolab_persistence::MemoryStore;

    use super::*;

    fn gate() -> (AccessGate, TokenStore) {
        let tokens = TokenStore::new(Arc::new(MemoryStore::new()));
        (AccessGate::new(tokens.clone(), DEFAULT_CRM_LOGIN_URL), tokens)
    }

    #[test]
    fn url_token_grants_and_is_persisted() {
        let (gate, tokens) = gate();
        let context = NavigationContext::from_query("token=fresh");
        assert!(gate.check(&context, false).is_granted());
        assert_eq!(tokens.token().as_deref(), Some("fresh"));
    }

    #[test]
    fn stored_token_only_counts_when_embedded() {
        let (gate, tokens) = gate();
        tokens.set_token("stored").unwrap();
        let context = NavigationContext::default();
        assert!(gate.check(&context, true).is_granted());
        assert_eq!(
            gate.check(&context, false),
            Access::Denied {
                login_url: DEFAULT_CRM_LOGIN_URL.to_string()
            }
        );
    }

    #[test]
    fn embedded_without_token_is_denied() {
        let (gate, _) = gate();
        assert!(!gate.check(&NavigationContext::default(), true).is_granted());
    }
}
