//! Webhook handler for GitHub push events

use axum::{
    body::{Body, to_bytes},
    extract::State as AxumState,
    http::HeaderMap,
    response::Response,
};
use tracing::{debug, error, warn};

use super::response::{bad_request, deployment_response};
use crate::SharedState;
use crate::deploy::DeploymentOutcome;

/// Handles the GitHub webhook POST request.
///
/// The body is read up to `max_request_bytes`; anything larger is treated as
/// an unparsable payload. An empty body is a bad request and never reaches
/// the deployment trigger. The deployment runs in its own task, so it
/// finishes even if the client hangs up before the response is sent.
pub async fn handle_webhook(
    AxumState(state): AxumState<SharedState>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let event = headers.get("X-GitHub-Event").and_then(|v| v.to_str().ok());
    debug!("Webhook received; X-GitHub-Event: {:?}", event);

    let limit = state.config.max_request_bytes;
    let body = match to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Could not read webhook body within {} bytes: {}", limit, e);
            return deployment_response(DeploymentOutcome::Failure);
        }
    };

    if body.is_empty() {
        warn!("Webhook request without a body");
        return bad_request();
    }

    let deployment = tokio::spawn(async move { state.trigger.deploy(&body).await });

    let outcome = deployment.await.unwrap_or_else(|e| {
        error!("Deployment task did not complete: {}", e);
        DeploymentOutcome::Failure
    });
    deployment_response(outcome)
}
