//! Lab report forms CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use geolab_cli::logging::{LogConfig, LogFormat, init_logging};
use geolab_cli::settings::Settings;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    App, run_draft, run_fetch, run_list, run_login, run_normalize, run_submit, run_summary,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let exit_code = match run(cli) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Runs one command. `Ok(false)` means the command ran but did not succeed,
/// and has already said why.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let app = || Settings::load(cli.config.as_deref()).map(App::new);
    match cli.command {
        Command::Normalize(args) => {
            println!("{}", run_normalize(&args));
            Ok(true)
        }
        Command::Summary(args) => run_summary(&args).map(|()| true),
        Command::Submit(args) => run_submit(&app()?, &args),
        Command::Fetch(args) => run_fetch(&app()?, &args).map(|()| true),
        Command::List(args) => run_list(&app()?, &args).map(|()| true),
        Command::Login(args) => run_login(&app()?, &args),
        Command::Draft(command) => run_draft(&app()?, &command),
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
