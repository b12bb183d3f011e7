//! Request middleware: CORS, trusted hosts and the process-time header.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::warn;

pub const PROCESS_TIME_HEADER: &str = "x-process-time";

pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    // credentials rule out a literal `*`, so a wildcard mirrors the caller's origin
    let origin = if allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}

/// Whether `host` (without port) matches one of the allowed patterns.
///
/// Patterns are `*`, an exact host name, or `*.domain` which matches any
/// subdomain of `domain`.
pub fn host_allowed(host: &str, patterns: &[String]) -> bool {
    let host = host.to_ascii_lowercase();
    patterns.iter().any(|pattern| {
        let pattern = pattern.to_ascii_lowercase();
        if pattern == "*" {
            true
        } else if let Some(domain) = pattern.strip_prefix("*.") {
            host.len() > domain.len() + 1
                && host.ends_with(domain)
                && host[..host.len() - domain.len()].ends_with('.')
        } else {
            host == pattern
        }
    })
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        // [::1]:8000
        return host.split(']').next().map(|h| &h[1..]).unwrap_or(host);
    }
    host.rsplit_once(':').map(|(h, _)| h).unwrap_or(host)
}

pub async fn trusted_hosts(
    State(allowed): State<Arc<Vec<String>>>,
    request: Request,
    next: Next,
) -> Response {
    if allowed.iter().any(|p| p == "*") {
        return next.run(request).await;
    }

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(strip_port)
        .or_else(|| request.uri().host())
        .map(str::to_string);

    match host {
        Some(host) if host_allowed(&host, &allowed) => next.run(request).await,
        other => {
            warn!(host = ?other, "Rejected request with untrusted host");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": "Invalid host header" })),
            )
                .into_response()
        }
    }
}

/// Stamp each response with its handling time in seconds
pub async fn process_time(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let mut response = next.run(request).await;
    let elapsed = format!("{:.6}", started.elapsed().as_secs_f64());
    if let Ok(value) = HeaderValue::from_str(&elapsed) {
        response.headers_mut().insert(PROCESS_TIME_HEADER, value);
    }
    response
}
