use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use std::collections::BTreeMap;
use std::panic::Location;
use std::sync::Arc;
use thiserror::Error;

use super::api_error::{ApiException, DomainError};

/// Per-field validation messages.
///
/// Several messages for the same field are joined with `"; "`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation, merging with earlier ones for the same field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let message = message.into();
        self.errors
            .entry(field.into())
            .and_modify(|existing| {
                existing.push_str("; ");
                existing.push_str(&message);
            })
            .or_insert(message);
    }

    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// `Err(Failure::Validation)` when any violation was recorded
    pub fn into_result(self) -> Result<(), Failure> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Failure::Validation(self))
        }
    }
}

/// Everything that can end a request unsuccessfully.
///
/// Handlers return `Result<_, Failure>`; the failure translation middleware
/// turns it into a problem report.
#[derive(Debug, Error)]
pub enum Failure {
    /// Input failed field-level validation
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),

    /// A parameter could not be converted to the expected type
    #[error("invalid value '{value}' for parameter '{parameter}'")]
    TypeMismatch {
        value: String,
        parameter: String,
        expected: Option<String>,
    },

    /// The request body could not be parsed
    #[error("malformed request body: {reason}")]
    MalformedBody { reason: String },

    /// A required parameter was not supplied
    #[error("missing required parameter '{name}'")]
    MissingParameter { name: String, expected: String },

    /// No route matched the request path
    #[error("no route matches '{path}'")]
    NoRoute { path: String },

    /// The route exists but not for this method
    #[error("method '{method}' is not allowed")]
    MethodNotAllowed {
        method: Method,
        supported: Vec<Method>,
    },

    /// The request body has a content type the handler does not accept
    #[error("content type '{content_type}' is not supported")]
    UnsupportedMediaType {
        content_type: String,
        supported: Vec<String>,
    },

    /// A value the handler relied on was absent
    #[error("required value '{what}' was absent at {location}")]
    NullReference {
        what: String,
        location: &'static Location<'static>,
    },

    /// Caller-defined failure with its own status and message
    #[error("{0}")]
    Domain(Box<dyn ApiException>),

    /// Anything else, including handler panics
    #[error("{error}")]
    Internal {
        error: anyhow::Error,
        /// `file:line:column` where the fault surfaced
        location: String,
    },
}

impl Failure {
    pub fn validation(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }

    pub fn type_mismatch(
        value: impl Into<String>,
        parameter: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            value: value.into(),
            parameter: parameter.into(),
            expected: Some(expected.into()),
        }
    }

    pub fn malformed_body(reason: impl Into<String>) -> Self {
        Self::MalformedBody {
            reason: reason.into(),
        }
    }

    pub fn missing_parameter(name: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::MissingParameter {
            name: name.into(),
            expected: expected.into(),
        }
    }

    pub fn no_route(path: impl Into<String>) -> Self {
        Self::NoRoute { path: path.into() }
    }

    pub fn method_not_allowed(method: Method, supported: Vec<Method>) -> Self {
        Self::MethodNotAllowed { method, supported }
    }

    pub fn unsupported_media_type<I, S>(content_type: impl Into<String>, supported: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::UnsupportedMediaType {
            content_type: content_type.into(),
            supported: supported.into_iter().map(Into::into).collect(),
        }
    }

    #[track_caller]
    pub fn null_reference(what: impl Into<String>) -> Self {
        Self::NullReference {
            what: what.into(),
            location: Location::caller(),
        }
    }

    pub fn domain(error: impl ApiException) -> Self {
        Self::Domain(Box::new(error))
    }

    #[track_caller]
    pub fn internal(error: impl Into<anyhow::Error>) -> Self {
        Self::Internal {
            error: error.into(),
            location: Location::caller().to_string(),
        }
    }

    /// HTTP status this failure is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::TypeMismatch { .. }
            | Self::MalformedBody { .. }
            | Self::MissingParameter { .. } => StatusCode::BAD_REQUEST,
            Self::NoRoute { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::NullReference { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Domain(error) => error.status(),
        }
    }
}

impl From<FieldErrors> for Failure {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<DomainError> for Failure {
    fn from(error: DomainError) -> Self {
        Self::domain(error)
    }
}

impl From<anyhow::Error> for Failure {
    #[track_caller]
    fn from(error: anyhow::Error) -> Self {
        Self::Internal {
            error,
            location: Location::caller().to_string(),
        }
    }
}

/// Turns an absent value into [`Failure::NullReference`]
pub trait OptionExt<T> {
    fn or_null_reference(self, what: &str) -> Result<T, Failure>;
}

impl<T> OptionExt<T> for Option<T> {
    #[track_caller]
    fn or_null_reference(self, what: &str) -> Result<T, Failure> {
        match self {
            Some(value) => Ok(value),
            None => Err(Failure::null_reference(what)),
        }
    }
}

/// A failure waiting in the response extensions for the translation
/// middleware.
#[derive(Debug, Clone)]
pub struct PendingFailure(pub Arc<Failure>);

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let mut response = self.status().into_response();
        response
            .extensions_mut()
            .insert(PendingFailure(Arc::new(self)));
        response
    }
}
