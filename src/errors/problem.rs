use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

/// Content type for RFC 9457 problem reports
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

const ABOUT_BLANK: &str = "about:blank";

/// RFC 9457 problem report returned for every failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProblemReport {
    /// Problem type URI
    #[serde(rename = "type")]
    pub type_url: String,
    /// Reason phrase of the status
    pub title: String,
    /// HTTP status code
    pub status: u16,
    /// Human-readable explanation of this occurrence
    pub detail: String,
    /// Request path the problem occurred on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Trace id, identical to the one in the matching log line
    pub trace_id: Uuid,
    /// When the problem was reported
    pub timestamp: DateTime<Utc>,
    /// Field validation messages (validation failures only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

impl ProblemReport {
    pub fn new(status: StatusCode, detail: impl Into<String>, trace_id: Uuid) -> Self {
        Self {
            type_url: ABOUT_BLANK.to_string(),
            title: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: None,
            trace_id,
            timestamp: Utc::now(),
            errors: None,
        }
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn with_errors(mut self, errors: BTreeMap<String, String>) -> Self {
        self.errors = Some(errors);
        self
    }
}

impl IntoResponse for ProblemReport {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = (status, Json(self)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        response
    }
}
