//! Extractors whose rejections are [`Failure`]s

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Query, Request},
    http::{header, request::Parts},
    Json,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::str::FromStr;
use utoipa::IntoParams;

use crate::envelope::paged::{normalize_page, normalize_size};
use crate::envelope::PagedResponse;
use crate::errors::Failure;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Last path segment of a type name, e.g. `u32` or `String`
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// JSON body extractor.
///
/// Unparseable bodies become [`Failure::MalformedBody`] and a missing or
/// non-JSON content type becomes [`Failure::UnsupportedMediaType`].
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(JsonRejection::MissingJsonContentType(_)) => Err(Failure::unsupported_media_type(
                content_type,
                [JSON_CONTENT_TYPE],
            )),
            Err(rejection) => Err(Failure::malformed_body(rejection.body_text())),
        }
    }
}

/// Raw query parameters with typed, failure-producing accessors
#[derive(Debug, Clone, Default)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn new(params: HashMap<String, String>) -> Self {
        Self(params)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Parse a parameter that must be present
    pub fn required<T: FromStr>(&self, name: &str) -> Result<T, Failure> {
        match self.0.get(name) {
            Some(raw) => parse_param(name, raw),
            None => Err(Failure::missing_parameter(name, short_type_name::<T>())),
        }
    }

    /// Parse a parameter that may be absent
    pub fn optional<T: FromStr>(&self, name: &str) -> Result<Option<T>, Failure> {
        self.0.get(name).map(|raw| parse_param(name, raw)).transpose()
    }
}

fn parse_param<T: FromStr>(name: &str, raw: &str) -> Result<T, Failure> {
    raw.parse::<T>()
        .map_err(|_| Failure::type_mismatch(raw, name, short_type_name::<T>()))
}

#[async_trait]
impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts.uri.query().unwrap_or_default().to_string();
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| Failure::type_mismatch(raw, "query", "key=value pairs"))?;
        Ok(Self(params))
    }
}

/// `page` and `size` query parameters for paged endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number, starting at 1 (default 1)
    pub page: Option<i32>,
    /// Items per page (default 10)
    pub size: Option<i32>,
}

impl PageParams {
    /// Slice `content` in memory
    pub fn slice<T>(self, content: Vec<T>) -> PagedResponse<T> {
        PagedResponse::of(content, self.page, self.size)
    }

    /// Wrap a page fetched elsewhere together with its total count
    pub fn external<T>(self, content: Vec<T>, total_elements: u64) -> PagedResponse<T> {
        PagedResponse::of_external(content, self.page, self.size, total_elements)
    }

    /// Normalized zero-based offset and limit, for LIMIT/OFFSET style queries
    pub fn offset_limit(self) -> (u64, u32) {
        let page = normalize_page(self.page);
        let size = normalize_size(self.size);
        (u64::from(page - 1) * u64::from(size), size)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PageParams
where
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = QueryParams::from_request_parts(parts, state).await?;
        Ok(Self {
            page: params.optional("page")?,
            size: params.optional("size")?,
        })
    }
}
