//! Client side of the laboratory report API.
//!
//! - [`RemoteSync`]: the save / export / fetch / list contract the form
//!   controller depends on, and [`LabApiClient`], its HTTP implementation.
//! - [`SessionBus`]: process-wide session events. A `401` from any request
//!   publishes [`SessionEvent::SessionExpired`] so a session guard can react
//!   independently of the form that made the request.
//! - [`FrameMessage`]: messages exchanged with an embedding host.

mod api;
mod config;
mod error;
mod frame;
mod remote;
mod session;

pub use api::LabApiClient;
pub use config::{ClientConfig, DEFAULT_API_URL};
pub use error::{ApiError, Result};
pub use frame::FrameMessage;
pub use remote::{ExportArtifact, RemoteSync, ReportDetail, ReportSummary, SaveReceipt};
pub use session::{SessionBus, SessionEvent, Subscription};
