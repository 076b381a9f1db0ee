//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;

use crate::dispatch::RegistryOptions;
use crate::dispatch::RegistryOptionsBuilder;
use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct Config {
    /// Report unmatched fires and registrations as errors.
    pub strict_dispatch: bool,
    /// Directory for rolling log files.
    pub logs_path: PathBuf,
    /// Write logs to daily files under `logs_path` as well as stdout.
    pub log_to_file: bool,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Config {
    pub fn new() -> Self {
        Self {
            strict_dispatch: false,
            logs_path: PathBuf::from("logs"),
            log_to_file: true,
            log_filter: "pwr_dispatch=info".to_string(),
        }
    }

    /// Overrides the defaults with `DISPATCH_STRICT`, `LOGS_PATH`,
    /// `LOG_TO_FILE` and `LOG_FILTER` when they are set.
    ///
    /// An empty `LOGS_PATH` is rejected while file logging is on.
    pub fn load(&mut self) -> Result<(), AppError> {
        if let Ok(value) = std::env::var("DISPATCH_STRICT") {
            self.strict_dispatch = parse_bool("DISPATCH_STRICT", &value)?;
        }
        if let Ok(value) = std::env::var("LOG_TO_FILE") {
            self.log_to_file = parse_bool("LOG_TO_FILE", &value)?;
        }
        if let Ok(value) = std::env::var("LOGS_PATH") {
            if value.trim().is_empty() && self.log_to_file {
                return Err(AppError::MissingConfig {
                    key: "LOGS_PATH".to_string(),
                });
            }
            self.logs_path = PathBuf::from(value);
        }
        if let Ok(value) = std::env::var("LOG_FILTER") {
            self.log_filter = value;
        }
        Ok(())
    }

    pub fn registry_options(&self) -> Result<RegistryOptions, AppError> {
        RegistryOptionsBuilder::default()
            .strict(self.strict_dispatch)
            .build()
            .map_err(|e| AppError::ConfigurationError { msg: e.to_string() })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(AppError::ConfigurationError {
            msg: format!("Invalid boolean \"{}\" for {}", value, key),
        }),
    }
}
