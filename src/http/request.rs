//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) as early as possible
//! - Log every request using the configured access log template
//!
//! # Design Decisions
//! - Access log is written before the handler runs, like a classic access log
//! - Template placeholders: `%a` remote address, `%m` method, `%U` request URI

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderName,
    middleware::Next,
    response::Response,
};

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Render an access log line from a template.
pub fn format_request(format: &str, remote_addr: &str, method: &str, uri: &str) -> String {
    format
        .replace("%a", remote_addr)
        .replace("%m", method)
        .replace("%U", uri)
}

/// Middleware writing one access log event per request.
pub async fn access_log(State(format): State<Arc<str>>, request: Request, next: Next) -> Response {
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let line = format_request(
        &format,
        &remote_addr,
        request.method().as_str(),
        &request.uri().to_string(),
    );
    tracing::info!(request_id = %request_id, "{}", line);

    next.run(request).await
}
