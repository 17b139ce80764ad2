//! Local persistence for the report forms.
//!
//! # Features
//!
//! - **Key-value store** abstraction over a directory of files or memory
//! - **Atomic writes** (temp file + rename) so a crash never leaves half a draft
//! - **Drafts** keyed by form type and report id, restored leniently
//! - **Debounced draft writes**: the last edit within the window wins
//! - **Session token** storage
//!
//! # Draft keys
//!
//! ```text
//! equi_arena_form_draft_v1:new     <- draft of an unsaved report
//! equi_arena_form_draft_v1:42      <- draft of edits to report 42
//! ```
//!
//! # Architecture
//!
//! - `store/` - [`LocalStore`] trait and its file and memory backends
//! - `draft/` - draft keys, the draft store and the debounced writer
//! - `token.rs` - bearer token persistence
//! - `error.rs` - Error types with user-friendly messages

mod draft;
mod error;
mod store;
mod token;

pub use draft::{DraftConfig, DraftKey, DraftStore, DraftWriter};
pub use error::{Result, StoreError};
pub use store::{FileStore, LocalStore, MemoryStore, SharedStore};
pub use token::{TOKEN_KEY, TokenStore};
