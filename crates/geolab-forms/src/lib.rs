//! Form engine for the laboratory report forms.
//!
//! [`FormController`] owns one report record for its lifetime: it applies
//! field edits, persists drafts after a quiet period, loads an existing
//! report on open and submits the record with calculator outputs filled in.
//! Everything outside the record is reached through seams:
//!
//! - [`geolab_client::RemoteSync`] for the API
//! - [`HostFrame`] for the page embedding the form
//! - [`Notifier`] for user-facing notices
//!
//! The `host` module also carries the access gate and the session guard
//! that sit next to the form in an embedded deployment.

mod controller;
mod error;
mod export;
mod host;
mod notify;

pub use controller::{FormController, FormDeps, SaveMode, SaveOutcome};
pub use error::{FormError, Result};
pub use export::export_file_name;
pub use host::{
    Access, AccessGate, ChannelFrame, DEFAULT_CRM_LOGIN_URL, HostFrame, NavigationContext,
    SessionGuard, Standalone, TOKEN_REFRESH_INTERVAL, receive_host_message,
};
pub use notify::{ChannelNotifier, Notice, NoticeLevel, Notifier, TracingNotifier};
