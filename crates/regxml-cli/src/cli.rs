//! CLI argument definitions for the report converter.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

use regxml_model::ReportType;

#[derive(Parser)]
#[command(
    name = "regxml",
    version,
    about = "Convert regulatory reporting workbooks (AIF, AIFM, OFK) to XML",
    long_about = "Convert regulatory reporting workbooks to schema-conformant XML.\n\n\
                  Every .xls/.xlsx file in the input directory becomes <name>.xml in the\n\
                  output directory; the generated files are then validated against the\n\
                  report's XSD."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Console log format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Append error events to this file (default: regxml.log).
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Configuration file (default: regxml.toml in the input directory, if present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert AIF workbooks (fund-level AIFMD record).
    Aif(RunArgs),

    /// Convert AIFM workbooks (manager-level AIFMD record).
    Aifm(RunArgs),

    /// Convert OFK workbooks (DNB balance and flow report).
    Ofk(RunArgs),

    /// Validate already generated XML files without converting.
    Validate(ValidateArgs),

    /// Show the rule registry of a report type.
    Rules(RulesArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Directory containing the input workbooks.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: Option<PathBuf>,

    /// Directory for generated XML files (default: the input directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// XSD used for validation (default: the report's schema in the input directory).
    #[arg(long = "schema", value_name = "XSD")]
    pub schema: Option<PathBuf>,

    /// Skip the validation pass.
    #[arg(long = "no-validate")]
    pub no_validate: bool,

    /// Exit with status 1 when a file is skipped or fails validation.
    #[arg(long = "fail-on-error")]
    pub fail_on_error: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Report type whose schema applies.
    #[arg(value_enum)]
    pub report: ReportArg,

    /// Directory containing the XML files (default: the configured output directory).
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// XSD used for validation.
    #[arg(long = "schema", value_name = "XSD")]
    pub schema: Option<PathBuf>,

    /// Exit with status 1 when any file fails validation.
    #[arg(long = "fail-on-error")]
    pub fail_on_error: bool,
}

#[derive(Args)]
pub struct RulesArgs {
    /// Report type to describe.
    #[arg(value_enum)]
    pub report: ReportArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportArg {
    Aif,
    Aifm,
    Ofk,
}

impl From<ReportArg> for ReportType {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::Aif => ReportType::Aif,
            ReportArg::Aifm => ReportType::Aifm,
            ReportArg::Ofk => ReportType::Ofk,
        }
    }
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
