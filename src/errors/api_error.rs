use axum::http::StatusCode;
use thiserror::Error;

/// A failure the client is meant to see as-is.
///
/// Implement this on your own error types to give them an HTTP status; the
/// message (by default the `Display` output) is surfaced verbatim in the
/// problem report.
///
/// ```
/// use api_response::errors::ApiException;
/// use axum::http::StatusCode;
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("Order {0} was already shipped")]
/// struct AlreadyShipped(u64);
///
/// impl ApiException for AlreadyShipped {
///     fn status(&self) -> StatusCode {
///         StatusCode::CONFLICT
///     }
/// }
/// ```
pub trait ApiException: std::error::Error + Send + Sync + 'static {
    /// HTTP status reported for this failure
    fn status(&self) -> StatusCode;

    /// Client-facing message
    fn message(&self) -> String {
        self.to_string()
    }
}

/// Ready-made [`ApiException`] carrying a message and a status
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DomainError {
    message: String,
    status: StatusCode,
}

impl DomainError {
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl ApiException for DomainError {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn message(&self) -> String {
        self.message.clone()
    }
}

/// Helpers for common domain errors
impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::NOT_FOUND)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::CONFLICT)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::FORBIDDEN)
    }
}
