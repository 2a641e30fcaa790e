//! File logging for sitebook queries and ledger writes.
//!
//! Every CLI run appends to a daily file `sitebook.<date>.log` in the XDG state
//! dir (`~/.local/state/sitebook`). Old days are pruned past
//! `logging.max_files`. `RUST_LOG` wins over `logging.level`.

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Install the file subscriber for a sitebook run.
///
/// Keep the returned guard alive until exit; dropping it flushes the writer.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    let log_dir = Config::state_dir();
    std::fs::create_dir_all(&log_dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("sitebook")
        .filename_suffix("log")
        .max_log_files(config.max_files.max(1))
        .build(&log_dir)
        .map_err(|e| Error::Config(format!("failed to create log file: {}", e)))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    match tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
    {
        Ok(()) => tracing::info!(
            log_dir = %log_dir.display(),
            level = %config.level,
            max_files = config.max_files,
            "Logging initialized"
        ),
        // Events keep flowing to whichever subscriber got there first
        Err(e) => tracing::debug!(error = %e, "global subscriber already installed"),
    }

    Ok(LoggingGuard { _guard: guard })
}

/// Route logs to the test harness output. Safe to call from every test.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

/// Flushes the non-blocking file writer on drop.
pub struct LoggingGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Base log path; rotated files carry a date between stem and extension.
pub fn log_file_path() -> PathBuf {
    Config::log_path()
}
