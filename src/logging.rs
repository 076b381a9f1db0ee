//! Logging setup and configuration.

use std::path::Path;

use tracing_appender::non_blocking::NonBlocking;
use tracing_appender::rolling::RollingFileAppender;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Config;
use crate::error::AppError;

const LOG_FILE_PREFIX: &str = "pwr-dispatch";
const LOG_FILES_KEPT: usize = 7;

/// Installs the global log subscriber: stdout always, plus daily files under
/// [`Config::logs_path`] when [`Config::log_to_file`] is set.
///
/// Records emitted through the `log` facade are forwarded to the same layers.
pub fn setup_logging(config: &Config) -> Result<(), AppError> {
    let file_layer = if config.log_to_file {
        let writer = file_writer(&config.logs_path)?;
        Some(fmt::layer().with_writer(writer).with_ansi(false))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(fmt::layer().with_writer(std::io::stdout).with_ansi(true))
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::ConfigurationError {
            msg: format!("Failed to install log subscriber: {}", e),
        })
}

/// `RUST_LOG` wins over [`Config::log_filter`].
fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
}

/// Non-blocking writer over a daily rolling file in `logs_path`.
fn file_writer(logs_path: &Path) -> Result<NonBlocking, AppError> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(LOG_FILES_KEPT)
        .build(logs_path)
        .map_err(|e| AppError::ConfigurationError {
            msg: format!("Cant open log directory '{}': {}", logs_path.to_string_lossy(), e),
        })?;

    let (writer, guard) = tracing_appender::non_blocking(appender);

    // Leak the guard to prevent it from being dropped
    std::mem::forget(guard);

    Ok(writer)
}
