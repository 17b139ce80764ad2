//! Report records for the laboratory test forms.
//!
//! Two report types share the same shape:
//!
//! - [`SandEquivalentReport`] - sand equivalent test ("equi arena"), three trials
//! - [`GradationReport`] - aggregate gradation by sieve analysis ("gran agregado"),
//!   eighteen sieve slots
//!
//! Both implement [`Report`], which is what the form controller, the draft
//! store and the remote client are generic over.
//!
//! # Invariants
//!
//! Every record that leaves this crate satisfies:
//!
//! - trial arrays have exactly their declared length
//! - option fields hold a member of their option set (`-` when unset)
//! - numeric fields are finite or `None`
//!
//! Records coming from outside (drafts, remote payloads, single-field edits)
//! go through [`merge_snapshot`], which enforces all three.

pub mod calc;
mod error;
mod gradation;
mod kind;
pub mod lenient;
mod options;
mod progress;
mod report;
mod sand_equivalent;
mod snapshot;
mod trials;

pub use error::{ModelError, Result};
pub use gradation::{
    GradationDerived, GradationField, GradationReport, GradationTrialField, SIEVE_COUNT,
    SIEVE_LABELS,
};
pub use kind::FormKind;
pub use options::{
    AgitationMethod, Approver, BalanceCode, OvenCode, Reviewer, SamplePreparation, SampleType,
    UNSET,
};
pub use progress::{ProgressSummary, SectionStatus, has_text};
pub use report::{Identity, Report, ReportField, TextFormat};
pub use sand_equivalent::{
    SandEquivalentDerived, SandEquivalentField, SandEquivalentReport, SandEquivalentTrialField,
    TRIAL_COUNT,
};
pub use snapshot::{merge_snapshot, parse_snapshot, with_field};
pub use trials::{Reading, TrialArray};
