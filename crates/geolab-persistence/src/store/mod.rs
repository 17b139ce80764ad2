//! String-keyed local storage.

mod file;
mod memory;

use std::sync::Arc;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// A persistent string-keyed store of text values.
///
/// Implementations are shared between the form controller, the debounced
/// writer and the session layer, so they must be usable from any thread.
pub trait LocalStore: Send + Sync {
    /// Reads the value for `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// A store shared across components.
pub type SharedStore = Arc<dyn LocalStore>;
