use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// Informational page served at `GET /`.
pub const STATUS_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Webhook Service</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 40px; background: #f5f5f5; }
        .container { max-width: 600px; margin: 0 auto; background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
        h1 { color: #333; border-bottom: 2px solid #007acc; padding-bottom: 10px; }
        .status { background: #d4edda; color: #155724; padding: 15px; border-radius: 4px; margin: 20px 0; }
        .endpoint { background: #f8f9fa; padding: 15px; border-left: 4px solid #007acc; margin: 20px 0; }
        code { background: #e9ecef; padding: 2px 6px; border-radius: 3px; font-family: monospace; }
    </style>
</head>
<body>
    <div class="container">
        <h1>Webhook Service</h1>
        <div class="status">
            <strong>✓ Service Active</strong><br>
            Webhook service is running and ready to receive requests.
        </div>
        <div class="endpoint">
            <strong>Webhook Endpoint:</strong><br>
            <code>POST /webhook</code>
        </div>
        <p>This service handles GitHub webhook events for automated deployments.</p>
    </div>
</body>
</html>"#;

pub async fn serve_status_page() -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        STATUS_PAGE,
    )
        .into_response()
}
