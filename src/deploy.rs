//! Push-event detection and the two-step deployment pipeline

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{DeployError, Result};
use crate::runner::CommandRunner;

/// Branch refs whose pushes trigger a deployment.
pub const TRACKED_REFS: [&str; 2] = ["refs/heads/master", "refs/heads/main"];

/// Pulls the latest source into the working tree.
pub const UPDATE_COMMAND: &str = "git pull";

/// Restarts the user service running the deployed application.
pub const RESTART_COMMAND: &str = "systemctl --user restart www";

/// Result of handling one webhook payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentOutcome {
    Success,
    Failure,
}

/// The part of a GitHub push payload the trigger cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookPayload {
    /// Top-level `ref`, `None` if absent or not a string.
    pub git_ref: Option<String>,
}

impl WebhookPayload {
    /// Parse a raw request body as JSON and extract `ref`.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let payload: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| DeployError::PayloadParse(e.to_string()))?;

        let git_ref = payload
            .get("ref")
            .and_then(|r| r.as_str())
            .map(String::from);

        Ok(Self { git_ref })
    }

    /// Returns the ref if it names a tracked branch.
    pub fn tracked_ref(&self) -> Option<&str> {
        self.git_ref
            .as_deref()
            .filter(|r| TRACKED_REFS.contains(r))
    }
}

/// Returns the ref of a push to a tracked branch, logging why anything else
/// is ignored.
pub fn tracked_push_ref(body: &[u8]) -> Option<String> {
    let payload = match WebhookPayload::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("JSON parse error: {}", e);
            return None;
        }
    };

    match payload.tracked_ref() {
        Some(git_ref) => Some(git_ref.to_owned()),
        None => {
            info!(
                "Not a push event to master/main branch (ref: {:?})",
                payload.git_ref
            );
            None
        }
    }
}

/// Returns true if `body` is a JSON push payload for a tracked branch.
pub fn is_tracked_push(body: &[u8]) -> bool {
    tracked_push_ref(body).is_some()
}

/// A single deployment run, used to correlate log lines.
#[derive(Debug, Clone)]
pub struct Deployment {
    pub id: Uuid,
    pub git_ref: String,
    pub started_at: DateTime<Utc>,
}

impl Deployment {
    pub fn new(git_ref: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            git_ref: git_ref.to_string(),
            started_at: Utc::now(),
        }
    }

    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }
}

/// Decides whether a payload is a tracked push and, if so, deploys.
pub struct DeploymentTrigger {
    runner: Arc<dyn CommandRunner>,
    // Only one deployment runs at a time.
    execution_lock: Mutex<()>,
}

impl DeploymentTrigger {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            execution_lock: Mutex::new(()),
        }
    }

    /// Run the deployment for `body`, collapsing every error into `Failure`.
    ///
    /// An ignored event (unparsable body, missing or untracked ref) is
    /// reported as `Failure` as well, same as a failed command.
    pub async fn deploy(&self, body: &[u8]) -> DeploymentOutcome {
        let Some(git_ref) = tracked_push_ref(body) else {
            return DeploymentOutcome::Failure;
        };

        let _guard = self.execution_lock.lock().await;
        let deployment = Deployment::new(&git_ref);
        info!(
            "Deployment {} - push to {} detected, executing deployment...",
            deployment.id, deployment.git_ref
        );

        match self.run_steps(&deployment).await {
            Ok(()) => {
                info!(
                    "Deployment {} for {} completed successfully in {}ms",
                    deployment.id,
                    deployment.git_ref,
                    deployment.elapsed_ms()
                );
                DeploymentOutcome::Success
            }
            Err(e) => {
                error!("Deployment {} failed: {}", deployment.id, e);
                DeploymentOutcome::Failure
            }
        }
    }

    async fn run_steps(&self, deployment: &Deployment) -> Result<()> {
        // Restart is skipped if the update fails.
        self.run_step(deployment, UPDATE_COMMAND).await?;
        self.run_step(deployment, RESTART_COMMAND).await
    }

    async fn run_step(&self, deployment: &Deployment, command: &str) -> Result<()> {
        debug!("Deployment {} - running '{}'", deployment.id, command);
        match self.runner.run(command).await? {
            Some(0) => Ok(()),
            code => Err(DeployError::CommandFailed {
                command: command.to_string(),
                code,
            }),
        }
    }
}
