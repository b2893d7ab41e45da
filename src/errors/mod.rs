//! Failures, domain errors and their translation into problem reports

pub mod api_error;
pub mod failure;
pub mod problem;
pub mod translator;

pub use api_error::{ApiException, DomainError};
pub use failure::{Failure, FieldErrors, OptionExt, PendingFailure};
pub use problem::{ProblemReport, APPLICATION_PROBLEM_JSON};
pub use translator::{
    ErrorTranslator, INTERNAL_ERROR_DETAIL, MALFORMED_BODY_DETAIL, NULL_REFERENCE_DETAIL,
    VALIDATION_FAILED,
};
