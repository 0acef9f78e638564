//! CLI argument definitions for `fieldmap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use fieldmap_cli::logging::LogFormat;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "fieldmap",
    version,
    about = "Copy and reshape JSON records with declarative map definitions",
    long_about = "Copy and reshape JSON records with declarative map definitions.\n\n\
                  A map definition lists destination fields and where their values\n\
                  come from: a source field, a nested map, or a constant."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Map a source record into a destination record.
    Apply(ApplyArgs),

    /// Show the mappings a definition compiles to.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// Map definition (JSON).
    #[arg(long = "map", short = 'm', value_name = "FILE")]
    pub map: PathBuf,

    /// Source record (JSON object).
    #[arg(long = "source", short = 's', value_name = "FILE")]
    pub source: PathBuf,

    /// Destination record to start from (default: empty object).
    #[arg(long = "destination", short = 'd', value_name = "FILE")]
    pub destination: Option<PathBuf>,

    /// Write the mapped record here instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Emit single-line JSON.
    #[arg(long = "compact")]
    pub compact: bool,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Map definition (JSON).
    #[arg(long = "map", short = 'm', value_name = "FILE")]
    pub map: PathBuf,
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

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
