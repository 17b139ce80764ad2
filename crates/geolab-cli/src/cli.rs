//! CLI argument definitions for the lab report tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use geolab_model::FormKind;

#[derive(Parser)]
#[command(
    name = "geolab",
    version,
    about = "Lab report forms - sand equivalent and aggregate gradation",
    long_about = "Fill, check and submit laboratory test reports.\n\n\
                  Records are JSON files in the report wire format. Drafts and the\n\
                  session token are kept in the local data directory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: settings.toml in the user config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Tidy a sample code, work order or date the way the forms do.
    Normalize(NormalizeArgs),

    /// Show completion and calculated values of a report file.
    Summary(SummaryArgs),

    /// Submit a report file, optionally downloading the spreadsheet.
    Submit(SubmitArgs),

    /// Print a stored report.
    Fetch(FetchArgs),

    /// List stored reports.
    List(ListArgs),

    /// Open a form URL: check access and keep its session token.
    Login(LoginArgs),

    /// Inspect or discard a local draft.
    #[command(subcommand)]
    Draft(DraftCommand),
}

#[derive(Parser)]
pub struct NormalizeArgs {
    #[arg(value_enum)]
    pub format: TextFormatArg,

    #[arg(value_name = "VALUE", allow_hyphen_values = true)]
    pub value: String,
}

#[derive(Parser)]
pub struct SummaryArgs {
    #[arg(value_enum, value_name = "FORM")]
    pub form: FormArg,

    /// JSON file with the report record.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct SubmitArgs {
    #[arg(value_enum, value_name = "FORM")]
    pub form: FormArg,

    /// JSON file with the report record.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Update this stored report instead of creating one.
    #[arg(long = "id", value_name = "ID")]
    pub id: Option<u64>,

    /// Also generate the spreadsheet and write it into DIR.
    #[arg(long = "export", value_name = "DIR")]
    pub export: Option<PathBuf>,

    /// Submit the record as written, without tidying codes and dates.
    #[arg(long = "no-normalize")]
    pub no_normalize: bool,
}

#[derive(Parser)]
pub struct FetchArgs {
    #[arg(value_enum, value_name = "FORM")]
    pub form: FormArg,

    #[arg(value_name = "ID")]
    pub id: u64,
}

#[derive(Parser)]
pub struct ListArgs {
    #[arg(value_enum, value_name = "FORM")]
    pub form: FormArg,

    /// Maximum number of reports to list.
    #[arg(long = "limit", default_value_t = 50)]
    pub limit: usize,
}

#[derive(Parser)]
pub struct LoginArgs {
    /// Form URL with `token` and optional `ensayo_id` query parameters.
    #[arg(value_name = "URL")]
    pub url: String,

    /// Accept a previously stored token, as an embedded form does.
    #[arg(long = "embedded")]
    pub embedded: bool,
}

#[derive(Subcommand)]
pub enum DraftCommand {
    /// Print the draft of a form.
    Show(DraftArgs),
    /// Delete the draft of a form.
    Clear(DraftArgs),
}

#[derive(Parser)]
pub struct DraftArgs {
    #[arg(value_enum, value_name = "FORM")]
    pub form: FormArg,

    /// Draft of this stored report (default: the unsaved new report).
    #[arg(long = "id", value_name = "ID")]
    pub id: Option<u64>,
}

/// CLI form choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormArg {
    #[value(alias = "equi-arena", alias = "se")]
    SandEquivalent,
    #[value(alias = "gran-agregado", alias = "gr")]
    Gradation,
}

impl From<FormArg> for FormKind {
    fn from(arg: FormArg) -> Self {
        match arg {
            FormArg::SandEquivalent => FormKind::SandEquivalent,
            FormArg::Gradation => FormKind::Gradation,
        }
    }
}

/// CLI normalizer choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TextFormatArg {
    SampleCode,
    WorkOrder,
    Date,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn submit_accepts_form_aliases() {
        let cli = Cli::try_parse_from([
            "geolab", "submit", "equi-arena", "report.json", "--id", "12", "--export", "out",
        ])
        .unwrap();
        let Command::Submit(args) = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(FormKind::from(args.form), FormKind::SandEquivalent);
        assert_eq!(args.id, Some(12));
        assert_eq!(args.export, Some(PathBuf::from("out")));
    }

    #[test]
    fn draft_subcommands_parse() {
        let cli = Cli::try_parse_from(["geolab", "draft", "clear", "gradation"]).unwrap();
        let Command::Draft(DraftCommand::Clear(args)) = cli.command else {
            panic!("expected draft clear");
        };
        assert_eq!(args.form, FormArg::Gradation);
        assert_eq!(args.id, None);
    }

    #[test]
    fn unknown_form_is_rejected() {
        assert!(Cli::try_parse_from(["geolab", "list", "marshall"]).is_err());
    }

    #[test]
    fn normalize_takes_format_and_value() {
        let cli = Cli::try_parse_from(["geolab", "normalize", "work-order", "ot 120 26"]).unwrap();
        let Command::Normalize(args) = cli.command else {
            panic!("expected normalize");
        };
        assert_eq!(args.format, TextFormatArg::WorkOrder);
        assert_eq!(args.value, "ot 120 26");
    }
}
