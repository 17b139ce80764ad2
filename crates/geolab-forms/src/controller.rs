//! The form state controller.
//!
//! One controller owns one report record. Every mutation goes through
//! [`FormController::set_field`], which replaces exactly one field and
//! re-applies the record invariants, then schedules a debounced draft write.
//!
//! # Concurrency
//!
//! - Record state sits behind a mutex that is never held across an `.await`.
//! - A fetch started by [`FormController::open`] checks a cancellation flag
//!   before applying its result; dropping the controller sets the flag.
//! - Saves are guarded by a busy latch: a second save while one is in flight
//!   fails with [`FormError::Busy`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use geolab_client::{ApiError, ExportArtifact, FrameMessage, RemoteSync, SaveReceipt};
use geolab_model::{
    ProgressSummary, Report, ReportField, TextFormat, merge_snapshot, with_field,
};
use geolab_normalize::{
    YearContext, normalize_flexible_date, normalize_sample_code, normalize_work_order,
    parse_number,
};
use geolab_persistence::{DraftKey, DraftWriter};
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::error::{FormError, Result};
use crate::export::export_file_name;
use crate::host::{HostFrame, NavigationContext};
use crate::notify::{Notice, Notifier};

/// What a save should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// Store the report.
    Save,
    /// Store the report and return the generated spreadsheet.
    Export,
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(SaveReceipt),
    /// The caller is responsible for writing `artifact.bytes` to `file_name`.
    Exported {
        file_name: String,
        artifact: ExportArtifact,
    },
}

/// Collaborators of a controller.
pub struct FormDeps<A> {
    pub remote: Arc<A>,
    pub drafts: DraftWriter,
    pub frame: Arc<dyn HostFrame>,
    pub notifier: Arc<dyn Notifier>,
}

impl<A> Clone for FormDeps<A> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
            drafts: self.drafts.clone(),
            frame: Arc::clone(&self.frame),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

struct FormState<R> {
    record: R,
    report_id: Option<u64>,
}

struct Shared<R> {
    state: Mutex<FormState<R>>,
    loading: AtomicBool,
    busy: AtomicBool,
}

impl<R> Shared<R> {
    fn state(&self) -> MutexGuard<'_, FormState<R>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the busy latch when a save ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Owns and edits one report record.
pub struct FormController<R: Report, A: RemoteSync> {
    shared: Arc<Shared<R>>,
    remote: Arc<A>,
    drafts: DraftWriter,
    frame: Arc<dyn HostFrame>,
    notifier: Arc<dyn Notifier>,
    cancelled: Arc<AtomicBool>,
    fetch_task: Mutex<Option<JoinHandle<()>>>,
}

impl<R: Report, A: RemoteSync> FormController<R, A> {
    /// Opens a form for `context`.
    ///
    /// The draft for the context's key is restored if present. When the
    /// context names a report, the controller starts loading it in the
    /// background and reports `is_loading()` until the fetch settles. Must be
    /// called within a tokio runtime.
    pub fn open(context: &NavigationContext, deps: FormDeps<A>) -> Self {
        let report_id = context.report_id;
        let key = DraftKey::new(R::KIND, report_id);
        let record = deps.drafts.drafts().load::<R>(key).unwrap_or_default();

        let controller = Self {
            shared: Arc::new(Shared {
                state: Mutex::new(FormState { record, report_id }),
                loading: AtomicBool::new(false),
                busy: AtomicBool::new(false),
            }),
            remote: deps.remote,
            drafts: deps.drafts,
            frame: deps.frame,
            notifier: deps.notifier,
            cancelled: Arc::new(AtomicBool::new(false)),
            fetch_task: Mutex::new(None),
        };

        if let Some(id) = report_id {
            controller.start_fetch(id);
        }
        tracing::debug!(kind = %R::KIND, ?report_id, "form opened");
        controller
    }

    fn start_fetch(&self, report_id: u64) {
        self.shared.loading.store(true, Ordering::SeqCst);

        let shared = Arc::clone(&self.shared);
        let remote = Arc::clone(&self.remote);
        let drafts = self.drafts.clone();
        let notifier = Arc::clone(&self.notifier);
        let cancelled = Arc::clone(&self.cancelled);

        let task = tokio::spawn(async move {
            let result = remote.fetch_by_id(R::KIND, report_id).await;
            if cancelled.load(Ordering::SeqCst) {
                tracing::debug!(report_id, "form closed, discarding fetched report");
                shared.loading.store(false, Ordering::SeqCst);
                return;
            }

            match result {
                Ok(detail) => match detail.payload {
                    Some(payload) => match merge_snapshot::<R>(payload) {
                        Ok(record) => {
                            let mut state = shared.state();
                            state.record = record;
                            schedule_draft(&drafts, &state);
                            tracing::info!(report_id, "loaded report");
                        }
                        Err(e) => {
                            tracing::warn!(report_id, error = %e, "unusable report payload");
                            notifier.notify(Notice::error(format!(
                                "Could not load report {report_id}: {e}"
                            )));
                        }
                    },
                    None => tracing::debug!(report_id, "report has no stored payload"),
                },
                Err(ApiError::Unauthorized) => {
                    tracing::warn!(report_id, "report fetch rejected, session expired");
                }
                Err(e) => {
                    tracing::warn!(report_id, error = %e, "failed to fetch report");
                    notifier.notify(Notice::error(format!(
                        "Could not load report {report_id}: {}",
                        e.user_message()
                    )));
                }
            }
            shared.loading.store(false, Ordering::SeqCst);
        });

        *self.fetch_task_slot() = Some(task);
    }

    fn fetch_task_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.fetch_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Waits for the fetch started by `open`, if any.
    pub async fn loaded(&self) {
        let task = self.fetch_task_slot().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "report fetch task failed");
                self.shared.loading.store(false, Ordering::SeqCst);
            }
        }
    }

    /// A copy of the current record.
    pub fn snapshot(&self) -> R {
        self.shared.state().record.clone()
    }

    /// Calculator outputs for the current record.
    pub fn derived(&self) -> R::Derived {
        self.shared.state().record.derived()
    }

    pub fn progress(&self) -> ProgressSummary {
        self.shared.state().record.progress()
    }

    /// Report being edited, `None` for a new one.
    pub fn report_id(&self) -> Option<u64> {
        self.shared.state().report_id
    }

    pub fn draft_key(&self) -> DraftKey {
        DraftKey::new(R::KIND, self.report_id())
    }

    /// True while the fetch started by `open` is outstanding.
    pub fn is_loading(&self) -> bool {
        self.shared.loading.load(Ordering::SeqCst)
    }

    /// True while a save is in flight.
    pub fn is_busy(&self) -> bool {
        self.shared.busy.load(Ordering::SeqCst)
    }

    /// Wire value of one field.
    pub fn field_value(&self, field: R::Field) -> Result<Value> {
        let value = serde_json::to_value(&self.shared.state().record)?;
        Ok(value.get(field.wire_name()).cloned().unwrap_or(Value::Null))
    }

    /// Replaces exactly one field, keeping all others.
    ///
    /// The value is sanitized like a draft load: unknown option values become
    /// unset, bad numbers become null, arrays keep their fixed length.
    pub fn set_field(&self, field: R::Field, value: Value) -> Result<()> {
        let mut state = self.shared.state();
        let updated = with_field(&state.record, field, value)?;
        if updated != state.record {
            state.record = updated;
            schedule_draft(&self.drafts, &state);
        }
        Ok(())
    }

    /// Parses `raw` and stores it at `index` of a trial array.
    ///
    /// Blank or invalid text stores null. Returns `false` without touching
    /// the record when `index` is out of range.
    pub fn set_trial_value(&self, field: R::TrialField, index: usize, raw: &str) -> Result<bool> {
        let field: R::Field = field.into();
        let Value::Array(mut values) = self.field_value(field)? else {
            return Ok(false);
        };
        let Some(slot) = values.get_mut(index) else {
            tracing::debug!(field = field.wire_name(), index, "trial index out of range");
            return Ok(false);
        };
        *slot = parse_number(raw).map_or(Value::Null, Value::from);
        self.set_field(field, Value::Array(values))?;
        Ok(true)
    }

    /// Rewrites a text field with `normalizer`, writing only if the value
    /// changes. Returns whether it changed.
    pub fn apply_normalized_field(
        &self,
        field: R::Field,
        normalizer: impl Fn(&str) -> String,
    ) -> Result<bool> {
        let Value::String(current) = self.field_value(field)? else {
            return Ok(false);
        };
        let normalized = normalizer(&current);
        if normalized == current {
            return Ok(false);
        }
        self.set_field(field, Value::String(normalized))?;
        Ok(true)
    }

    /// Applies the record's configured normalizer to `field`.
    ///
    /// Fields without a text format are left alone.
    pub fn normalize_field(&self, field: R::Field, year: YearContext) -> Result<bool> {
        let Some((_, format)) = R::formatted_fields().iter().find(|(f, _)| *f == field) else {
            return Ok(false);
        };
        let format = *format;
        self.apply_normalized_field(field, |raw| match format {
            TextFormat::SampleCode => normalize_sample_code(raw, year),
            TextFormat::WorkOrder => normalize_work_order(raw, year),
            TextFormat::Date => normalize_flexible_date(raw, year),
        })
    }

    /// Normalizes every formatted text field. Returns how many changed.
    pub fn normalize_all(&self, year: YearContext) -> Result<usize> {
        let mut changed = 0;
        for (field, _) in R::formatted_fields() {
            if self.normalize_field(*field, year)? {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Replaces the whole record with a payload from the remote service or a
    /// file, re-applying the record invariants.
    pub fn load_from_remote(&self, payload: Value) -> Result<()> {
        let record = merge_snapshot::<R>(payload)?;
        let mut state = self.shared.state();
        state.record = record;
        schedule_draft(&self.drafts, &state);
        Ok(())
    }

    /// Clears the form and its draft.
    pub fn reset_to_empty(&self) {
        let mut state = self.shared.state();
        self.discard_draft(DraftKey::new(R::KIND, state.report_id));
        state.record = R::default();
    }

    fn discard_draft(&self, key: DraftKey) {
        if let Err(e) = self.drafts.discard(key) {
            tracing::warn!(key = %key, error = %e, "failed to delete draft");
        }
    }

    /// Validates and submits the record.
    ///
    /// The submitted record carries calculator outputs for overrides the
    /// user left empty. On success the draft is removed, the form is reset to
    /// a new empty report and an embedded host is asked to close the form.
    /// On failure the record and draft are kept. A rejected session is left to
    /// the session guard and produces no notice.
    pub async fn save(&self, mode: SaveMode) -> Result<SaveOutcome> {
        if self
            .shared
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(FormError::Busy);
        }
        let _busy = BusyGuard(&self.shared.busy);

        let (submission, report_id) = {
            let state = self.shared.state();
            (state.record.submission(), state.report_id)
        };

        let missing = submission.identity().missing_required();
        if !missing.is_empty() {
            let error = FormError::MissingFields(missing);
            self.notifier.notify(Notice::error(error.user_message()));
            return Err(error);
        }

        let kind = R::KIND;
        let work_order = submission.identity().work_order_code.to_string();
        let payload = serde_json::to_value(&submission)?;
        tracing::info!(%kind, ?report_id, ?mode, "submitting report");

        let result = match mode {
            SaveMode::Save => self
                .remote
                .save(kind, payload, report_id)
                .await
                .map(SaveOutcome::Saved),
            SaveMode::Export => self
                .remote
                .save_and_export(kind, payload, report_id)
                .await
                .map(|artifact| SaveOutcome::Exported {
                    file_name: export_file_name(
                        kind,
                        &work_order,
                        chrono::Utc::now().date_naive(),
                    ),
                    artifact,
                }),
        };

        match result {
            Ok(outcome) => {
                {
                    let mut state = self.shared.state();
                    self.discard_draft(DraftKey::new(kind, report_id));
                    state.record = R::default();
                    state.report_id = None;
                }
                if self.frame.is_embedded() {
                    self.frame.post(FrameMessage::CloseModal);
                }
                let message = match mode {
                    SaveMode::Save => format!("{} saved.", kind.label()),
                    SaveMode::Export => format!("{} saved and exported.", kind.label()),
                };
                self.notifier.notify(Notice::success(message));
                Ok(outcome)
            }
            Err(ApiError::Unauthorized) => {
                tracing::warn!(%kind, ?report_id, "save rejected, session expired");
                Err(FormError::Remote(ApiError::Unauthorized))
            }
            Err(e) => {
                tracing::warn!(%kind, ?report_id, error = %e, "save failed");
                self.notifier.notify(Notice::error(format!(
                    "Error saving {}: {}",
                    kind.label(),
                    e.user_message()
                )));
                Err(FormError::Remote(e))
            }
        }
    }
}

impl<R: Report, A: RemoteSync> Drop for FormController<R, A> {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl<R: Report, A: RemoteSync> std::fmt::Debug for FormController<R, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("kind", &R::KIND)
            .field("report_id", &self.report_id())
            .field("loading", &self.is_loading())
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}

/// Schedules a draft write of the current record under its current key.
fn schedule_draft<R: Report>(drafts: &DraftWriter, state: &FormState<R>) {
    let key = DraftKey::new(R::KIND, state.report_id);
    match serde_json::to_string(&state.record) {
        Ok(text) => drafts.schedule(key, text),
        Err(e) => tracing::warn!(key = %key, error = %e, "failed to serialize draft"),
    }
}
