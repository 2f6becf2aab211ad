//! `regxml`: regulatory workbook to XML converter.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use regxml_cli::config::{FileConfig, load_config, resolve_log_file};
use regxml_cli::logging::{LogConfig, LogFormat, init_logging};
use regxml_cli::types::RunResult;
use regxml_model::ReportType;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_report, run_rules, run_validate};
use crate::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();

    let file_config = match load_config(cli.config.as_deref(), &config_search_dir(&cli.command)) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    };
    let log_config = log_config_from_cli(&cli, file_config.as_ref());
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let file_config = file_config.as_ref();
    let exit_code = match &cli.command {
        Command::Aif(args) => {
            finish(run_report(ReportType::Aif, args, file_config), args.fail_on_error)
        }
        Command::Aifm(args) => {
            finish(run_report(ReportType::Aifm, args, file_config), args.fail_on_error)
        }
        Command::Ofk(args) => {
            finish(run_report(ReportType::Ofk, args, file_config), args.fail_on_error)
        }
        Command::Validate(args) => finish(run_validate(args, file_config), args.fail_on_error),
        Command::Rules(args) => match run_rules(args.report.into()) {
            Ok(()) => 0,
            Err(error) => {
                tracing::error!("{error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

/// Prints the summary; 1 on a fatal error, or on any failure with `--fail-on-error`.
fn finish(result: anyhow::Result<RunResult>, fail_on_error: bool) -> i32 {
    match result {
        Ok(result) => {
            print_summary(&result);
            i32::from(fail_on_error && result.has_errors())
        }
        Err(error) => {
            tracing::error!("{error:#}");
            1
        }
    }
}

/// `regxml.toml` is looked up in the directory the command reads from.
fn config_search_dir(command: &Command) -> PathBuf {
    let dir = match command {
        Command::Aif(args) | Command::Aifm(args) | Command::Ofk(args) => args.input_dir.as_deref(),
        Command::Validate(args) => args.dir.as_deref(),
        Command::Rules(_) => None,
    };
    dir.unwrap_or_else(|| Path::new(".")).to_path_buf()
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli, file: Option<&FileConfig>) -> LogConfig {
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
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => io::stderr().is_terminal(),
    };
    if !matches!(cli.command, Command::Rules(_)) {
        config.error_log = Some(resolve_log_file(cli.log_file.as_deref(), file));
    }
    config
}
