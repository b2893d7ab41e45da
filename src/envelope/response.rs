use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::trace::TraceContext;

/// Uniform envelope for successful responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    status: u16,
    trace_id: Uuid,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<T>,
    timestamp: DateTime<Utc>,
}

/// Named fields for building an envelope by hand.
///
/// `trace_id` and `timestamp` are optional; when left empty they are resolved
/// from the trace context and the clock.
#[derive(Debug, Clone)]
pub struct EnvelopeParts<T> {
    pub status: StatusCode,
    pub trace_id: Option<Uuid>,
    pub message: String,
    pub content: Option<T>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl<T> EnvelopeParts<T> {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            trace_id: None,
            message: message.into(),
            content: None,
            timestamp: None,
        }
    }

    pub fn content(mut self, content: T) -> Self {
        self.content = Some(content);
        self
    }

    pub fn trace_id(mut self, trace_id: Uuid) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

impl<T> ApiResponse<T> {
    /// Assemble an envelope, defaulting the trace id and timestamp
    pub fn from_parts(trace: &TraceContext, parts: EnvelopeParts<T>) -> Self {
        Self {
            status: parts.status.as_u16(),
            trace_id: parts.trace_id.unwrap_or_else(|| trace.resolve()),
            message: parts.message,
            content: parts.content,
            timestamp: parts.timestamp.unwrap_or_else(Utc::now),
        }
    }

    /// 200 OK with content
    pub fn success_with(trace: &TraceContext, message: impl Into<String>, content: T) -> Self {
        Self::status_with(trace, message, content, StatusCode::OK)
    }

    /// 201 Created with content
    pub fn created(trace: &TraceContext, message: impl Into<String>, content: T) -> Self {
        Self::status_with(trace, message, content, StatusCode::CREATED)
    }

    /// Arbitrary status with content
    pub fn status_with(
        trace: &TraceContext,
        message: impl Into<String>,
        content: T,
        status: StatusCode,
    ) -> Self {
        Self::from_parts(trace, EnvelopeParts::new(status, message).content(content))
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn trace_id(&self) -> Uuid {
        self.trace_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn content(&self) -> Option<&T> {
        self.content.as_ref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn into_content(self) -> Option<T> {
        self.content
    }
}

impl ApiResponse<()> {
    /// 200 OK without content
    pub fn success(trace: &TraceContext, message: impl Into<String>) -> Self {
        Self::from_parts(trace, EnvelopeParts::new(StatusCode::OK, message))
    }

    /// Arbitrary status without content
    pub fn status_only(trace: &TraceContext, message: impl Into<String>, status: StatusCode) -> Self {
        Self::from_parts(trace, EnvelopeParts::new(status, message))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self)).into_response()
    }
}
