//! Report drafts: keys, restore/save, and the debounced writer.

mod config;
mod key;
mod store;
mod writer;

pub use config::DraftConfig;
pub use key::DraftKey;
pub use store::DraftStore;
pub use writer::DraftWriter;
