use axum::http::Method;
use tracing::{error, warn};

use super::failure::Failure;
use super::problem::ProblemReport;
use crate::trace::TraceContext;

/// Detail of every validation problem report
pub const VALIDATION_FAILED: &str = "Validation Failed";

/// Detail for unparseable bodies; the body itself is never echoed
pub const MALFORMED_BODY_DETAIL: &str =
    "Malformed JSON request. Please check your request body format.";

/// Detail for absent-value faults
pub const NULL_REFERENCE_DETAIL: &str = "A null pointer exception occurred.";

/// Detail for every unclassified fault
pub const INTERNAL_ERROR_DETAIL: &str = "Internal Server Error. Please contact technical support";

/// Converts failures into problem reports and logs each one under the trace id
/// it reports.
#[derive(Debug, Clone, Default)]
pub struct ErrorTranslator;

fn bracketed<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined: Vec<String> = items.into_iter().map(|s| s.as_ref().to_string()).collect();
    format!("[{}]", joined.join(", "))
}

fn method_names(methods: &[Method]) -> String {
    bracketed(methods.iter().map(Method::as_str))
}

impl ErrorTranslator {
    pub fn new() -> Self {
        Self
    }

    /// Translate one failure.
    ///
    /// The trace id is taken from `trace`, or generated and stored there
    /// first, so the log line below and anything logged later for the same
    /// request carry the id returned in the report.
    pub fn translate(&self, failure: &Failure, trace: &TraceContext) -> ProblemReport {
        let trace_id = trace.get_or_generate();
        let status = failure.status();

        match failure {
            Failure::Validation(errors) => {
                warn!(trace_id = %trace_id, errors = ?errors.as_map(), "Validation error");
                ProblemReport::new(status, VALIDATION_FAILED, trace_id)
                    .with_errors(errors.as_map().clone())
            }
            Failure::TypeMismatch {
                value,
                parameter,
                expected,
            } => {
                let detail = format!(
                    "Invalid value '{}' for parameter '{}'. Expected type: {}.",
                    value,
                    parameter,
                    expected.as_deref().unwrap_or("unknown")
                );
                warn!(trace_id = %trace_id, "Type mismatch error: {}", detail);
                ProblemReport::new(status, detail, trace_id)
            }
            Failure::MalformedBody { reason } => {
                warn!(trace_id = %trace_id, reason = %reason, "Malformed JSON request");
                ProblemReport::new(status, MALFORMED_BODY_DETAIL, trace_id)
            }
            Failure::MissingParameter { name, expected } => {
                let detail = format!(
                    "Required request parameter '{}' (type: {}) is missing.",
                    name, expected
                );
                warn!(trace_id = %trace_id, "Missing parameter: {}", detail);
                ProblemReport::new(status, detail, trace_id)
            }
            Failure::NoRoute { path } => {
                let detail = format!(
                    "The requested resource '/{}' was not found.",
                    path.trim_start_matches('/')
                );
                warn!(trace_id = %trace_id, "404 Not Found: {}", detail);
                ProblemReport::new(status, detail, trace_id)
            }
            Failure::MethodNotAllowed { method, supported } => {
                let detail = format!(
                    "Method '{}' is not supported for this endpoint. Supported methods are: {}",
                    method,
                    method_names(supported)
                );
                warn!(trace_id = %trace_id, "Method not allowed: {}", detail);
                ProblemReport::new(status, detail, trace_id)
            }
            Failure::UnsupportedMediaType {
                content_type,
                supported,
            } => {
                let detail = format!(
                    "Content type '{}' is not supported. Supported content types: {}",
                    content_type,
                    bracketed(supported)
                );
                warn!(trace_id = %trace_id, "Unsupported media type: {}", detail);
                ProblemReport::new(status, detail, trace_id)
            }
            Failure::NullReference { what, location } => {
                error!(
                    trace_id = %trace_id,
                    location = %location,
                    value = %what,
                    "Null reference: required value was absent"
                );
                ProblemReport::new(status, NULL_REFERENCE_DETAIL, trace_id)
            }
            Failure::Domain(err) => {
                let message = err.message();
                if status.is_server_error() {
                    error!(trace_id = %trace_id, status = %status.as_u16(), "Business logic exception: {}", message);
                } else {
                    warn!(trace_id = %trace_id, status = %status.as_u16(), "Business logic exception: {}", message);
                }
                ProblemReport::new(status, message, trace_id)
            }
            Failure::Internal { error, location } => {
                error!(
                    trace_id = %trace_id,
                    location = %location,
                    "Unhandled error: {:#}",
                    error
                );
                ProblemReport::new(status, INTERNAL_ERROR_DETAIL, trace_id)
            }
        }
    }
}
