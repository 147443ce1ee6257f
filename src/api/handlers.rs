//! Preflight and catch-all handlers

use axum::{
    http::{HeaderMap, Method},
    response::Response,
};

use super::response::{not_found, preflight};

/// Headers added by a Cloudflare tunnel in front of the service.
pub const TUNNEL_HEADERS: [&str; 3] = ["cf-ray", "cf-connecting-ip", "cf-visitor"];

/// Returns true if the request was forwarded through a Cloudflare tunnel.
pub fn is_tunneled_request(headers: &HeaderMap) -> bool {
    TUNNEL_HEADERS.iter().any(|name| headers.contains_key(*name))
}

/// Answers `OPTIONS` on any path with a CORS preflight, everything else
/// without a route with `404 Not Found`.
pub async fn fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        preflight()
    } else {
        not_found()
    }
}
