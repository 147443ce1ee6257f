//! External command execution for deployment steps

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tracing::{error, info, warn};

use crate::error::{DeployError, Result};

/// Capability for running a deployment command line.
///
/// Implementations report the process exit code (`None` when the process was
/// terminated by a signal). Output is not captured; only the status matters.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command_line: &str) -> Result<Option<i32>>;
}

/// Runs commands as child processes, inheriting the environment of the server.
#[derive(Debug, Clone, Default)]
pub struct ShellCommandRunner {
    working_dir: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl ShellCommandRunner {
    pub fn new(working_dir: Option<PathBuf>, timeout: Option<Duration>) -> Self {
        Self {
            working_dir,
            timeout,
        }
    }
}

#[async_trait]
impl CommandRunner for ShellCommandRunner {
    async fn run(&self, command_line: &str) -> Result<Option<i32>> {
        // Split by whitespace for program + args
        let mut parts = command_line.split_whitespace();
        let program = parts.next().ok_or_else(|| {
            error!("Refusing to run an empty command line");
            DeployError::ConfigError("empty command line".to_string())
        })?;

        let mut cmd = Command::new(program);
        cmd.args(parts).kill_on_drop(true);
        match &self.working_dir {
            Some(dir) => {
                info!("Executing (cwd = '{}'): {}", dir.display(), command_line);
                cmd.current_dir(dir);
            }
            None => info!("Executing: {}", command_line),
        }

        let mut child = cmd.spawn().map_err(|source| {
            error!("{} failed to start: {}", command_line, source);
            DeployError::CommandSpawnFailed {
                command: command_line.to_string(),
                source,
            }
        })?;

        let status = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => status?,
                Err(_) => {
                    warn!(
                        "{} did not finish within {}s, killing it",
                        command_line,
                        limit.as_secs()
                    );
                    if let Err(e) = child.kill().await {
                        error!("Could not kill '{}': {}", command_line, e);
                    }
                    return Err(DeployError::CommandTimedOut {
                        command: command_line.to_string(),
                        secs: limit.as_secs(),
                    });
                }
            },
            None => child.wait().await?,
        };

        if !status.success() {
            warn!("Command failed with exit code: {:?}", status.code());
        }
        Ok(status.code())
    }
}
