// Process logging
// Timestamped, leveled log lines to stdout and to `<log dir>/<file>`

use crate::Result;
use crate::config::LogConfig;
use crate::error::NotifierError;
use std::fs;
use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::prelude::*;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Keeps the file writer alive; dropping it flushes buffered lines
#[must_use = "dropping the guard stops the file logger"]
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Install the global subscriber described by `config`
///
/// `RUST_LOG` takes precedence over `config.default_filter`.
pub fn init(config: &LogConfig) -> Result<LoggingGuard> {
    fs::create_dir_all(&config.directory).map_err(|e| NotifierError::FileSystemError {
        path: config.directory.display().to_string(),
        source: e,
    })?;

    let file_appender = tracing_appender::rolling::never(&config.directory, &config.file_name);
    let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_filter))
        .map_err(|e| NotifierError::config(format!("Invalid log filter: {}", e)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
                .with_target(false)
                .with_writer(io::stdout),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .try_init()
        .map_err(|e| NotifierError::Other(format!("Failed to install log subscriber: {}", e)))?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
