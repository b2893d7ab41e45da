//! Request-scoped trace id slot

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;
use std::sync::{Arc, OnceLock};
use uuid::Uuid;

/// Correlation id cell for one in-flight request.
///
/// Clones share the same cell, so the middleware, the handler and the failure
/// translator of a request all observe the same id. The cell is written at
/// most once; later writers read the existing value.
#[derive(Debug, Clone, Default)]
pub struct TraceContext {
    slot: Arc<OnceLock<Uuid>>,
}

impl TraceContext {
    /// Create an empty context (no trace id yet)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context already holding `trace_id`
    pub fn with_trace_id(trace_id: Uuid) -> Self {
        Self {
            slot: Arc::new(OnceLock::from(trace_id)),
        }
    }

    /// Create a context holding a freshly generated trace id
    pub fn generate() -> Self {
        Self::with_trace_id(Uuid::new_v4())
    }

    /// The trace id currently held, if any
    pub fn current(&self) -> Option<Uuid> {
        self.slot.get().copied()
    }

    /// Current trace id, or a fresh one when the slot is empty.
    ///
    /// Does not populate the slot.
    pub fn resolve(&self) -> Uuid {
        self.current().unwrap_or_else(Uuid::new_v4)
    }

    /// Current trace id, or a fresh one that is stored before returning.
    pub fn get_or_generate(&self) -> Uuid {
        *self.slot.get_or_init(Uuid::new_v4)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for TraceContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(trace) = parts.extensions.get::<TraceContext>() {
            return Ok(trace.clone());
        }

        // No trace middleware in front of this handler: hand out a context that
        // later extractors and the failure translator can still share.
        let trace = TraceContext::new();
        parts.extensions.insert(trace.clone());
        Ok(trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_empty_context_has_no_trace_id() {
        let trace = TraceContext::new();
        assert_eq!(trace.current(), None);
    }

    #[test]
    fn test_resolve_does_not_populate() {
        let trace = TraceContext::new();
        let first = trace.resolve();
        let second = trace.resolve();

        assert_ne!(first, second);
        assert_eq!(trace.current(), None);
    }

    #[test]
    fn test_get_or_generate_populates_once() {
        let trace = TraceContext::new();
        let first = trace.get_or_generate();
        let second = trace.get_or_generate();

        assert_eq!(first, second);
        assert_eq!(trace.current(), Some(first));
    }

    #[test]
    fn test_existing_trace_id_wins() {
        let id = Uuid::new_v4();
        let trace = TraceContext::with_trace_id(id);

        assert_eq!(trace.resolve(), id);
        assert_eq!(trace.get_or_generate(), id);
    }

    #[test]
    fn test_clones_share_the_slot() {
        let trace = TraceContext::new();
        let shared = trace.clone();
        let id = shared.get_or_generate();

        assert_eq!(trace.current(), Some(id));
    }

    #[tokio::test]
    async fn test_extractor_reuses_request_extension() {
        let trace = TraceContext::generate();
        let request = Request::builder()
            .extension(trace.clone())
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let extracted = TraceContext::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted.current(), trace.current());
    }

    #[tokio::test]
    async fn test_extractor_without_middleware_inserts_context() {
        let request = Request::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let extracted = TraceContext::from_request_parts(&mut parts, &()).await.unwrap();
        let id = extracted.get_or_generate();

        let stored = parts.extensions.get::<TraceContext>().unwrap();
        assert_eq!(stored.current(), Some(id));
    }
}
