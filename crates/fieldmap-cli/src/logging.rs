//! Logging setup for the `fieldmap` CLI using `tracing-subscriber`.
//!
//! The core library only emits `tracing` events; this module decides where
//! they go and how they look.
//!
//! # Log Levels
//!
//! - `warn`: default, problems only
//! - `info`: files loaded and written
//! - `debug`: map compilation and per-map spans
//! - `trace`: one event per applied mapping (field names only, never values)

use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Where and how `fieldmap` writes its logs.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Maximum level emitted by the fieldmap crates.
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` override `level_filter` when set.
    pub use_env_filter: bool,
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Append logs to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human-readable.
    #[default]
    Pretty,
    /// One line per event.
    Compact,
    /// One JSON object per event, with timestamps.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
        }
    }
}

impl LogConfig {
    /// Pin the level; an explicit level also disables the `RUST_LOG` override.
    #[must_use]
    pub fn with_level(mut self, level_filter: LevelFilter, explicit: bool) -> Self {
        self.level_filter = level_filter;
        self.use_env_filter = !explicit;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Log to `path`; ANSI colours are turned off for files.
    #[must_use]
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.with_ansi = false;
        }
        self.log_file = path;
        self
    }

    #[must_use]
    pub fn with_ansi(mut self, with_ansi: bool) -> Self {
        self.with_ansi = with_ansi && self.log_file.is_none();
        self
    }

    /// Filter directive applied when `RUST_LOG` is not used.
    #[must_use]
    pub fn filter_directive(&self) -> String {
        let level = self.level_filter.to_string().to_lowercase();
        format!("warn,fieldmap_core={level},fieldmap_cli={level},fieldmap={level}")
    }
}

/// Install the global tracing subscriber. Call once at startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    match &config.log_file {
        Some(path) => {
            let file: File = OpenOptions::new().create(true).append(true).open(path)?;
            init_logging_with_writer(config, Mutex::new(file));
        }
        None => init_logging_with_writer(config, io::stderr),
    }
    Ok(())
}

/// Install the global tracing subscriber writing to `writer`.
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(build_env_filter(config));
    match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(false).with_writer(writer))
            .init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .without_time()
                    .with_target(false)
                    .with_ansi(config.with_ansi)
                    .with_writer(writer),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .without_time()
                    .with_target(false)
                    .with_ansi(config.with_ansi)
                    .with_writer(writer),
            )
            .init(),
    }
}

fn build_env_filter(config: &LogConfig) -> EnvFilter {
    if config.use_env_filter
        && let Ok(filter) = EnvFilter::try_from_default_env()
    {
        return filter;
    }
    EnvFilter::new(config.filter_directive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_warn_with_env_override() {
        let config = LogConfig::default();
        assert_eq!(config.level_filter, LevelFilter::WARN);
        assert!(config.use_env_filter);
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn directive_targets_fieldmap_crates() {
        let config = LogConfig::default().with_level(LevelFilter::TRACE, false);
        assert_eq!(
            config.filter_directive(),
            "warn,fieldmap_core=trace,fieldmap_cli=trace,fieldmap=trace"
        );
        assert!(config.use_env_filter);
    }

    #[test]
    fn explicit_level_disables_env_override() {
        let config = LogConfig::default().with_level(LevelFilter::DEBUG, true);
        assert!(!config.use_env_filter);
    }

    #[test]
    fn log_file_turns_off_ansi() {
        let config = LogConfig::default()
            .with_format(LogFormat::Json)
            .with_log_file(Some(PathBuf::from("fieldmap.log")))
            .with_ansi(true);
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.with_ansi);
        assert_eq!(config.log_file, Some(PathBuf::from("fieldmap.log")));
    }
}
