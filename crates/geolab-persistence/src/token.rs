//! Bearer token persistence.

use crate::error::Result;
use crate::store::SharedStore;

/// Store key of the session token.
pub const TOKEN_KEY: &str = "token";

/// Reads and writes the session bearer token.
#[derive(Clone)]
pub struct TokenStore {
    store: SharedStore,
}

impl TokenStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// The stored token, if any. Blank tokens and read failures count as none.
    pub fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read session token");
                None
            }
        }
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        self.store.set(TOKEN_KEY, token)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(TOKEN_KEY)
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("has_token", &self.token().is_some())
            .finish()
    }
}
