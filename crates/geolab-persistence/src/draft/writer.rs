//! Debounced draft writer.
//!
//! At most one write is pending per draft key. Scheduling a new write for a
//! key aborts the pending one for that key only, so only the last snapshot
//! inside the debounce window reaches the store. Dropping the writer does not
//! cancel pending writes.
//!
//! Due writes run while the writer lock is held, so a write that has started
//! always completes before a [`DraftWriter::cancel`] or
//! [`DraftWriter::discard`] for the same key returns.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;

use super::{DraftConfig, DraftKey, DraftStore};
use crate::error::Result;

struct Pending {
    generation: u64,
    text: String,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct WriterState {
    generation: u64,
    pending: HashMap<DraftKey, Pending>,
}

/// Persists draft snapshots after a quiet period.
///
/// Clones share pending writes. Must be used from within a tokio runtime.
/// Write failures are logged and dropped; a failed draft write never reaches
/// the user.
#[derive(Clone)]
pub struct DraftWriter {
    drafts: DraftStore,
    config: DraftConfig,
    state: Arc<Mutex<WriterState>>,
}

impl DraftWriter {
    pub fn new(drafts: DraftStore, config: DraftConfig) -> Self {
        Self {
            drafts,
            config,
            state: Arc::default(),
        }
    }

    pub fn drafts(&self) -> &DraftStore {
        &self.drafts
    }

    pub fn config(&self) -> &DraftConfig {
        &self.config
    }

    fn state(&self) -> MutexGuard<'_, WriterState> {
        lock(&self.state)
    }

    /// Schedules `text` to be written under `key` once the debounce window
    /// passes without another call for the same key. Replaces the pending
    /// write for `key`; other keys are untouched.
    pub fn schedule(&self, key: DraftKey, text: String) {
        if !self.config.enabled {
            return;
        }

        let mut state = self.state();
        state.generation += 1;
        let generation = state.generation;
        if let Some(previous) = state.pending.remove(&key) {
            previous.handle.abort();
        }

        let delay = self.config.debounce();
        let drafts = self.drafts.clone();
        let shared = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = lock(&shared);
            let current = state
                .pending
                .get(&key)
                .is_some_and(|pending| pending.generation == generation);
            if !current {
                return;
            }
            if let Some(pending) = state.pending.remove(&key) {
                write(&drafts, key, &pending.text);
            }
        });

        state.pending.insert(
            key,
            Pending {
                generation,
                text,
                handle,
            },
        );
    }

    /// Drops the pending write for `key`, if any. Returns whether one was
    /// pending.
    pub fn cancel(&self, key: DraftKey) -> bool {
        cancel_pending(&mut self.state(), key)
    }

    /// Drops the pending write for `key` and deletes its stored draft, with
    /// no write for `key` able to land in between.
    pub fn discard(&self, key: DraftKey) -> Result<()> {
        let mut state = self.state();
        cancel_pending(&mut state, key);
        self.drafts.delete(key)
    }

    /// Writes the pending snapshot for `key` now instead of waiting.
    pub fn flush(&self, key: DraftKey) {
        let mut state = self.state();
        if let Some(pending) = state.pending.remove(&key) {
            pending.handle.abort();
            write(&self.drafts, key, &pending.text);
        }
    }

    pub fn has_pending(&self, key: DraftKey) -> bool {
        self.state().pending.contains_key(&key)
    }

    /// Number of keys with a write pending.
    pub fn pending_count(&self) -> usize {
        self.state().pending.len()
    }
}

impl std::fmt::Debug for DraftWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftWriter")
            .field("config", &self.config)
            .field("pending", &self.pending_count())
            .finish_non_exhaustive()
    }
}

fn lock(state: &Mutex<WriterState>) -> MutexGuard<'_, WriterState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn cancel_pending(state: &mut WriterState, key: DraftKey) -> bool {
    match state.pending.remove(&key) {
        Some(pending) => {
            pending.handle.abort();
            tracing::trace!(key = %key, "cancelled pending draft write");
            true
        }
        None => false,
    }
}

fn write(drafts: &DraftStore, key: DraftKey, text: &str) {
    match drafts.save_text(key, text) {
        Ok(()) => tracing::debug!(key = %key, "draft written"),
        Err(e) => tracing::warn!(key = %key, error = %e, "failed to write draft"),
    }
}
