use std::path::PathBuf;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::HookConfig;
use crate::error::{DeployError, Result};

pub const DEFAULT_MAX_LOG_FILES: usize = 5;
const DEFAULT_LOG_FILTER: &str = "info";
const LOG_FILE_PREFIX: &str = "deploy_hook";

/// Daily rolling log files, kept alongside console output.
pub struct FileLogger {
    log_directory: PathBuf,
    max_files: usize,
    rotation: Rotation,
}

impl FileLogger {
    pub fn new(log_directory: PathBuf) -> Self {
        Self {
            log_directory,
            max_files: DEFAULT_MAX_LOG_FILES,
            rotation: Rotation::DAILY,
        }
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// Creates the log directory and a non-blocking writer into it.
    /// The returned guard must be held for as long as logs should be flushed.
    pub fn setup_file_logging(&self) -> Result<(NonBlocking, WorkerGuard)> {
        std::fs::create_dir_all(&self.log_directory).map_err(|e| {
            DeployError::ConfigError(format!(
                "Failed to create log directory '{}': {}",
                self.log_directory.display(),
                e
            ))
        })?;

        let file_appender = RollingFileAppender::builder()
            .rotation(self.rotation.clone())
            .filename_prefix(LOG_FILE_PREFIX)
            .max_log_files(self.max_files.max(1))
            .build(&self.log_directory)
            .map_err(|e| DeployError::ConfigError(format!("Failed to open log file: {}", e)))?;

        Ok(tracing_appender::non_blocking(file_appender))
    }
}

/// Installs the global subscriber: console output, plus rolling files when
/// `log_dir` is configured. Verbosity comes from `RUST_LOG` (default `info`).
pub fn setup_logging(config: &HookConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer()); // Console output

    let init_error =
        |e: tracing_subscriber::util::TryInitError| DeployError::ConfigError(e.to_string());

    match &config.log_dir {
        Some(dir) => {
            let (file_writer, guard) = FileLogger::new(dir.clone())
                .with_max_files(config.max_log_files)
                .setup_file_logging()?;
            registry
                .with(
                    fmt::layer()
                        .with_writer(file_writer)
                        .with_ansi(false), // Disable ANSI colors for file logs
                )
                .try_init()
                .map_err(init_error)?;
            Ok(Some(guard))
        }
        None => {
            registry.try_init().map_err(init_error)?;
            Ok(None)
        }
    }
}
