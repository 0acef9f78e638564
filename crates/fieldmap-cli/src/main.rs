//! `fieldmap` command line tool.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use fieldmap_cli::logging::{LogConfig, init_logging};

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{run_apply, run_inspect};
use crate::summary::print_inspect;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match &cli.command {
        Command::Apply(args) => run_apply(args),
        Command::Inspect(args) => run_inspect(args).map(|result| print_inspect(&result)),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Logging configuration from the global flags; `--log-level` wins over `-v`/`-q`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level = match cli.log_level {
        Some(level) => LogConfig::default().with_level(level.into(), true),
        None => LogConfig::default().with_level(
            cli.verbosity.tracing_level_filter(),
            cli.verbosity.is_present(),
        ),
    };
    let ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => io::stderr().is_terminal(),
    };
    level
        .with_format(cli.log_format.into())
        .with_log_file(cli.log_file.clone())
        .with_ansi(ansi)
}
