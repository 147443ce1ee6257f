//! HTTP surface: routing table, CORS headers and per-request logging

pub mod handlers;
pub mod response;
pub mod webhook;

pub use handlers::{fallback, is_tunneled_request};
pub use webhook::handle_webhook;

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
    routing,
};
use tower::limit::GlobalConcurrencyLimitLayer;
use tracing::info;

use crate::SharedState;
use crate::ui::serve_status_page;
use response::ALLOW_ORIGIN;

/// Builds the routing table.
///
/// | Method + path   | Handler                 |
/// |-----------------|-------------------------|
/// | `POST /webhook` | deployment trigger      |
/// | `GET /`         | static status page      |
/// | `OPTIONS *`     | CORS preflight          |
/// | anything else   | `404 Not Found`         |
pub fn router(state: SharedState) -> Router {
    let max_in_flight = state.config.max_connections.max(1);

    Router::new()
        .route("/", routing::get(serve_status_page).fallback(fallback))
        .route("/webhook", routing::post(handle_webhook).fallback(fallback))
        .fallback(fallback)
        .layer(middleware::from_fn(finalize_response))
        .layer(GlobalConcurrencyLimitLayer::new(max_in_flight))
        .with_state(state)
}

/// Adds the headers every response carries and logs the request.
async fn finalize_response(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let tunneled = is_tunneled_request(req.headers());

    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    // No keep-alive: one request per connection
    headers.insert(header::CONNECTION, HeaderValue::from_static("close"));

    info!(
        "{} {} -> {}{}",
        method,
        path,
        response.status().as_u16(),
        if tunneled { " (via Cloudflare tunnel)" } else { "" }
    );
    response
}
