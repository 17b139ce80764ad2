//! Draft restore, save and delete over a [`LocalStore`].

use geolab_model::{Report, parse_snapshot};

use super::DraftKey;
use crate::error::Result;
use crate::store::SharedStore;

/// Draft access for one store.
///
/// Restores are lenient: a missing, unreadable or corrupt draft is simply
/// no draft.
#[derive(Clone)]
pub struct DraftStore {
    store: SharedStore,
}

impl DraftStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Restores the draft under `key`, merged over the default record.
    pub fn load<R: Report>(&self, key: DraftKey) -> Option<R> {
        let text = match self.store.get(&key.storage_key()) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to read draft");
                return None;
            }
        };
        match parse_snapshot::<R>(&text) {
            Ok(record) => {
                tracing::debug!(key = %key, "restored draft");
                Some(record)
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "ignoring corrupt draft");
                None
            }
        }
    }

    /// Serializes `record` and writes it under `key` immediately.
    pub fn save<R: Report>(&self, key: DraftKey, record: &R) -> Result<()> {
        let text = serde_json::to_string(record)?;
        self.store.set(&key.storage_key(), &text)
    }

    /// Writes already serialized draft text under `key`.
    pub fn save_text(&self, key: DraftKey, text: &str) -> Result<()> {
        self.store.set(&key.storage_key(), text)
    }

    pub fn delete(&self, key: DraftKey) -> Result<()> {
        self.store.remove(&key.storage_key())
    }
}

impl std::fmt::Debug for DraftStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftStore").finish_non_exhaustive()
    }
}
