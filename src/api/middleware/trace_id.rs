use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};

use crate::trace::TraceContext;

/// Give every request a fresh trace id and log it on the way in and out.
///
/// The [`TraceContext`] is stored in the request extensions; everything
/// logged while the request runs is inside a span carrying `trace_id`.
pub async fn trace_id_middleware(mut request: Request, next: Next) -> Response {
    let start = Instant::now();
    let trace = TraceContext::generate();
    let trace_id = trace.get_or_generate();
    request.extensions_mut().insert(trace);

    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query = request.uri().query().unwrap_or("").to_string();
    let user_agent = request
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let span = info_span!("request", trace_id = %trace_id);

    async move {
        info!(
            method = %method,
            path = %path,
            query = %sanitize_query(&query),
            user_agent = %user_agent,
            "Incoming request"
        );

        let response = next.run(request).await;

        let duration = start.elapsed();
        let status = response.status();

        if status.is_success() {
            info!(
                method = %method,
                path = %path,
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                "Request completed"
            );
        } else if status.is_client_error() {
            warn!(
                method = %method,
                path = %path,
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                "Request failed (client error)"
            );
        } else if status.is_server_error() {
            warn!(
                method = %method,
                path = %path,
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                "Request failed (server error)"
            );
        }

        response
    }
    .instrument(span)
    .await
}

/// Mask values of sensitive query parameters
fn sanitize_query(query: &str) -> String {
    if query.is_empty() {
        return String::new();
    }

    query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if is_sensitive(key) => format!("{}=***", key),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn is_sensitive(key: &str) -> bool {
    const SENSITIVE: [&str; 4] = ["api_key", "token", "password", "secret"];
    let key = key.to_ascii_lowercase();
    SENSITIVE.iter().any(|s| key.contains(s))
}
