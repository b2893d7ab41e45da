//! Uniform response envelopes, pagination and problem-report error
//! translation for axum services.

pub mod api;
pub mod config;
pub mod envelope;
pub mod errors;
pub mod models;
pub mod trace;

pub use envelope::{ApiResponse, EnvelopeParts, PagedResponse};
pub use errors::{ApiException, DomainError, ErrorTranslator, Failure, FieldErrors, ProblemReport};
pub use trace::TraceContext;
