pub mod api;
pub mod deploy;
pub mod error;
pub mod logging;
pub mod runner;
pub mod ui;

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use deploy::DeploymentTrigger;
use error::{DeployError, Result};
use runner::CommandRunner;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 4096;
pub const DEFAULT_MAX_CONNECTIONS: usize = 16;
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct HookConfig {
    pub bind_address: String,
    /// Directory the deployment commands run in; inherited when unset.
    pub working_dir: Option<PathBuf>,
    /// Webhook bodies larger than this are treated as unparsable.
    pub max_request_bytes: usize,
    /// Requests processed at the same time; the rest wait.
    pub max_connections: usize,
    /// Per-command limit in seconds, `0` disables it.
    pub command_timeout_secs: u64,
    pub log_dir: Option<PathBuf>,
    pub max_log_files: usize,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            working_dir: None,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
            log_dir: None,
            max_log_files: logging::DEFAULT_MAX_LOG_FILES,
        }
    }
}

impl HookConfig {
    /// Returns the per-command timeout, if enabled.
    pub fn command_timeout(&self) -> Option<Duration> {
        (self.command_timeout_secs > 0).then(|| Duration::from_secs(self.command_timeout_secs))
    }
}

/// Load and parse the configuration file.
///
/// A missing file yields the defaults unless `required` is set.
pub fn load_config(path: &Path, required: bool) -> Result<HookConfig> {
    if !path.exists() && !required {
        return Ok(HookConfig::default());
    }

    let config_str = fs::read_to_string(path).map_err(|e| {
        DeployError::ConfigError(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let config: HookConfig = toml::from_str(&config_str)?;
    if config.max_request_bytes == 0 || config.max_connections == 0 {
        return Err(DeployError::ConfigError(format!(
            "'{}': max_request_bytes and max_connections must be greater than zero",
            path.display()
        )));
    }

    Ok(config)
}

/// Server context shared by every request.
pub struct AppState {
    pub config: HookConfig,
    pub trigger: DeploymentTrigger,
}

impl AppState {
    pub fn new(config: HookConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            config,
            trigger: DeploymentTrigger::new(runner),
        }
    }
}

pub type SharedState = Arc<AppState>;
