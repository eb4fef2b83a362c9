//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once, from the binary
//! - Route output to stdout (verbose) or an append-only log file
//! - File writes happen on a background thread, off the runtime
//!
//! # Design Decisions
//! - `RUST_LOG` takes precedence over the configured level
//! - The library only emits events; it never installs a subscriber

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name used when the configured log path is a directory.
pub const LOG_FILE_NAME: &str = "url-sentry.log";

/// Where and how much to log.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub level: String,
    pub verbose: bool,
    pub log_file: PathBuf,
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("error opening log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: tracing_appender::rolling::InitError,
    },

    #[error("log file path has no file name: {0}")]
    NoFileName(PathBuf),

    #[error("logging already initialized: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Resolve the log file path; a directory gets the default file name appended.
pub fn log_file_path(configured: &Path) -> PathBuf {
    if configured.is_dir() {
        configured.join(LOG_FILE_NAME)
    } else {
        configured.to_path_buf()
    }
}

/// Default filter directive for a level name.
pub fn filter_directive(level: &str) -> String {
    format!("url_sentry={}", level)
}

/// Open `path` for appending behind a non-blocking writer.
///
/// Buffered lines are flushed when the returned guard is dropped.
pub fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| LoggingError::NoFileName(path.to_path_buf()))?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .map_err(|source| LoggingError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Install the global subscriber.
///
/// When logging to a file the returned guard must be held for the life of
/// the process, or buffered lines are lost.
pub fn init_logging(settings: &LogSettings) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| filter_directive(&settings.level).into());

    let (stdout_layer, file_layer, guard) = if settings.verbose {
        (Some(fmt::layer()), None, None)
    } else {
        let (writer, guard) = file_writer(&log_file_path(&settings.log_file))?;
        (
            None,
            Some(fmt::layer().with_ansi(false).with_writer(writer)),
            Some(guard),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()?;
    Ok(guard)
}
