use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::errors::{ErrorTranslator, Failure, PendingFailure};
use crate::trace::TraceContext;

/// Replace failed responses with problem reports.
///
/// Picks up failures parked by [`Failure::into_response`] and the bare 405
/// responses axum's method routers emit, and runs them through the
/// [`ErrorTranslator`] with the request's trace context.
pub async fn problem_middleware(
    State(translator): State<Arc<ErrorTranslator>>,
    mut request: Request,
    next: Next,
) -> Response {
    let trace = match request.extensions().get::<TraceContext>() {
        Some(trace) => trace.clone(),
        None => {
            let trace = TraceContext::new();
            request.extensions_mut().insert(trace.clone());
            trace
        }
    };
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;

    if let Some(PendingFailure(failure)) = response.extensions_mut().remove::<PendingFailure>() {
        return translator
            .translate(&failure, &trace)
            .with_instance(path)
            .into_response();
    }

    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        if let Some(allow) = response.headers().get(header::ALLOW).cloned() {
            let failure = Failure::method_not_allowed(method, allowed_methods(response.headers()));
            let mut translated = translator
                .translate(&failure, &trace)
                .with_instance(path)
                .into_response();
            translated.headers_mut().insert(header::ALLOW, allow);
            return translated;
        }
    }

    response
}

/// Fallback for requests no route matched
pub async fn no_route_fallback(uri: Uri) -> Failure {
    Failure::no_route(uri.path())
}

fn allowed_methods(headers: &HeaderMap) -> Vec<Method> {
    headers
        .get_all(header::ALLOW)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|method| Method::from_bytes(method.trim().as_bytes()).ok())
        .collect()
}
