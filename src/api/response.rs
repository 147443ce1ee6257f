//! Fixed-shape responses

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::deploy::DeploymentOutcome;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";
const TEXT_PLAIN: &str = "text/plain";

/// Maps a deployment outcome to its status line and body.
pub fn deployment_response(outcome: DeploymentOutcome) -> Response {
    let (status, body) = match outcome {
        DeploymentOutcome::Success => (StatusCode::OK, "Deployment successful\n"),
        DeploymentOutcome::Failure => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Deployment failed\n",
        ),
    };

    (
        status,
        [
            (header::CONTENT_TYPE, TEXT_PLAIN),
            (header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS),
        ],
        body,
    )
        .into_response()
}

pub fn bad_request() -> Response {
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, TEXT_PLAIN)],
        "Bad Request",
    )
        .into_response()
}

pub fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, TEXT_PLAIN)],
        "Not Found",
    )
        .into_response()
}

/// CORS preflight answer, empty body.
pub fn preflight() -> Response {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS),
        ],
    )
        .into_response()
}
