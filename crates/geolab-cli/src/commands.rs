use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use geolab_cli::settings::Settings;
use geolab_client::{LabApiClient, RemoteSync, SessionBus};
use geolab_forms::{
    Access, AccessGate, ChannelNotifier, FormController, FormDeps, NavigationContext, Notice,
    NoticeLevel, SaveMode, SaveOutcome, SessionGuard, Standalone, TOKEN_REFRESH_INTERVAL,
};
use geolab_model::{
    FormKind, GradationReport, Report, SandEquivalentReport, merge_snapshot, parse_snapshot,
};
use geolab_normalize::{
    YearContext, normalize_flexible_date, normalize_sample_code, normalize_work_order,
};
use geolab_persistence::{DraftKey, DraftStore, DraftWriter, FileStore, SharedStore, TokenStore};
use serde_json::Value;

use crate::cli::{
    DraftArgs, DraftCommand, FetchArgs, ListArgs, LoginArgs, NormalizeArgs, SubmitArgs,
    SummaryArgs, TextFormatArg,
};
use crate::summary::{print_progress, print_reports, print_values};

/// Local storage and remote access shared by the commands.
pub struct App {
    settings: Settings,
    store: SharedStore,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let data_dir = settings.data_dir();
        tracing::debug!(data_dir = %data_dir.display(), "using local store");
        Self {
            store: Arc::new(FileStore::new(data_dir)),
            settings,
        }
    }

    fn tokens(&self) -> TokenStore {
        TokenStore::new(Arc::clone(&self.store))
    }

    fn drafts(&self) -> DraftStore {
        DraftStore::new(Arc::clone(&self.store))
    }

    fn draft_writer(&self) -> DraftWriter {
        DraftWriter::new(self.drafts(), self.settings.drafts.clone())
    }

    fn client(&self, session: SessionBus) -> Result<LabApiClient> {
        LabApiClient::new(&self.settings.client_config(), self.tokens(), session)
            .context("invalid API settings")
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

fn read_record(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Success | NoticeLevel::Info => println!("{notice}"),
        NoticeLevel::Error => eprintln!("{notice}"),
    }
}

pub fn run_normalize(args: &NormalizeArgs) -> String {
    let year = YearContext::current();
    match args.format {
        TextFormatArg::SampleCode => normalize_sample_code(&args.value, year),
        TextFormatArg::WorkOrder => normalize_work_order(&args.value, year),
        TextFormatArg::Date => normalize_flexible_date(&args.value, year),
    }
}

pub fn run_summary(args: &SummaryArgs) -> Result<()> {
    let text = read_record(&args.file)?;
    match FormKind::from(args.form) {
        FormKind::SandEquivalent => summarize::<SandEquivalentReport>(&text, &args.file),
        FormKind::Gradation => summarize::<GradationReport>(&text, &args.file),
    }
}

fn summarize<R: Report>(text: &str, path: &Path) -> Result<()> {
    let record: R = parse_snapshot(text)
        .with_context(|| format!("{} is not a {} record", path.display(), R::KIND.label()))?;
    print_progress(R::KIND.label(), &record.progress());
    print_values("Calculated", &serde_json::to_value(record.derived())?);
    let missing = record.identity().missing_required();
    if !missing.is_empty() {
        println!("Required before saving: {}", missing.join(", "));
    }
    Ok(())
}

/// Runs the form save flow on a record file. Returns `false` when the save
/// was rejected; the reason has been printed.
pub fn run_submit(app: &App, args: &SubmitArgs) -> Result<bool> {
    let text = read_record(&args.file)?;
    let record: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", args.file.display()))?;
    let runtime = runtime()?;
    runtime.block_on(async {
        match FormKind::from(args.form) {
            FormKind::SandEquivalent => submit::<SandEquivalentReport>(app, args, record).await,
            FormKind::Gradation => submit::<GradationReport>(app, args, record).await,
        }
    })
}

async fn submit<R: Report>(app: &App, args: &SubmitArgs, record: Value) -> Result<bool> {
    let session = SessionBus::new();
    let guard = SessionGuard::start(
        &session,
        app.tokens(),
        Arc::new(Standalone),
        TOKEN_REFRESH_INTERVAL,
    );
    let (notifier, notices) = ChannelNotifier::channel();
    let writer = app.draft_writer();
    let deps = FormDeps {
        remote: Arc::new(app.client(session)?),
        drafts: writer.clone(),
        frame: Arc::new(Standalone),
        notifier: Arc::new(notifier),
    };

    let controller = FormController::<R, _>::open(&NavigationContext::new(args.id), deps);
    controller.loaded().await;
    controller.load_from_remote(record)?;
    if !args.no_normalize {
        let changed = controller.normalize_all(YearContext::current())?;
        tracing::info!(changed, "normalized text fields");
    }

    let mode = if args.export.is_some() {
        SaveMode::Export
    } else {
        SaveMode::Save
    };
    let result = controller.save(mode).await;

    let mut reported = false;
    for notice in notices.try_iter() {
        reported |= notice.level == NoticeLevel::Error;
        print_notice(&notice);
    }
    guard.poll();
    if guard.is_expired() {
        eprintln!("Session expired. Open a fresh form link with `geolab login <URL>`.");
    }

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            let key = controller.draft_key();
            writer.flush(key);
            println!("Draft kept as {key}.");
            if reported {
                return Ok(false);
            }
            return Err(e).context("save failed");
        }
    };

    match outcome {
        SaveOutcome::Saved(receipt) => {
            println!("Report id: {}", receipt.id);
            if !receipt.report_number.is_empty() {
                println!("Report number: {}", receipt.report_number);
            }
        }
        SaveOutcome::Exported {
            file_name,
            artifact,
        } => {
            let dir = args.export.as_deref().unwrap_or(Path::new("."));
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            let path = dir.join(file_name);
            fs::write(&path, &artifact.bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
            if let Some(id) = artifact.report_id {
                println!("Report id: {id}");
            }
        }
    }
    Ok(true)
}

pub fn run_fetch(app: &App, args: &FetchArgs) -> Result<()> {
    let client = app.client(SessionBus::new())?;
    let runtime = runtime()?;
    runtime.block_on(async {
        match FormKind::from(args.form) {
            FormKind::SandEquivalent => fetch::<SandEquivalentReport>(&client, args.id).await,
            FormKind::Gradation => fetch::<GradationReport>(&client, args.id).await,
        }
    })
}

async fn fetch<R: Report>(client: &LabApiClient, id: u64) -> Result<()> {
    let detail = client
        .fetch_by_id(R::KIND, id)
        .await
        .with_context(|| format!("could not load {} report {id}", R::KIND.label()))?;
    print_values("Report", &serde_json::to_value(&detail.summary)?);
    match detail.payload {
        Some(payload) => {
            let record: R = merge_snapshot(payload)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        None => println!("Report {id} has no stored record."),
    }
    Ok(())
}

pub fn run_list(app: &App, args: &ListArgs) -> Result<()> {
    let kind = FormKind::from(args.form);
    let client = app.client(SessionBus::new())?;
    let runtime = runtime()?;
    let reports = runtime
        .block_on(client.list(kind, args.limit))
        .with_context(|| format!("could not list {} reports", kind.label()))?;
    print_reports(&reports);
    Ok(())
}

/// Returns whether access was granted.
pub fn run_login(app: &App, args: &LoginArgs) -> Result<bool> {
    let context = NavigationContext::from_url(&args.url)?;
    let gate = AccessGate::new(app.tokens(), app.settings.session.crm_login_url.clone());
    let embedded = args.embedded || app.settings.session.embedded;
    match gate.check(&context, embedded) {
        Access::Granted => {
            println!("Access granted.");
            if let Some(id) = context.report_id {
                println!("The link opens report {id}.");
            }
            Ok(true)
        }
        Access::Denied { login_url } => {
            eprintln!("Access denied. Sign in at {login_url}");
            Ok(false)
        }
    }
}

/// Returns `false` when `draft show` found nothing.
pub fn run_draft(app: &App, command: &DraftCommand) -> Result<bool> {
    let drafts = app.drafts();
    match command {
        DraftCommand::Show(args) => Ok(match FormKind::from(args.form) {
            FormKind::SandEquivalent => show_draft::<SandEquivalentReport>(&drafts, args)?,
            FormKind::Gradation => show_draft::<GradationReport>(&drafts, args)?,
        }),
        DraftCommand::Clear(args) => {
            let key = DraftKey::new(args.form.into(), args.id);
            drafts
                .delete(key)
                .with_context(|| format!("failed to delete draft {key}"))?;
            println!("Cleared draft {key}.");
            Ok(true)
        }
    }
}

fn show_draft<R: Report>(drafts: &DraftStore, args: &DraftArgs) -> Result<bool> {
    let key = DraftKey::new(R::KIND, args.id);
    let Some(record) = drafts.load::<R>(key) else {
        println!("No draft for {key}.");
        return Ok(false);
    };
    print_progress(R::KIND.label(), &record.progress());
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(true)
}
