use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

use super::extract::{ApiJson, PageParams, QueryParams};
use crate::envelope::{ApiResponse, PagedResponse};
use crate::errors::{Failure, OptionExt, ProblemReport};
use crate::models::{Item, ItemNotFound, NewItem};
use crate::trace::TraceContext;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub catalog: Vec<Item>,
}

impl AppStateInner {
    fn find(&self, id: u32) -> Result<&Item, Failure> {
        self.catalog
            .iter()
            .find(|item| item.id == id)
            .ok_or_else(|| Failure::domain(ItemNotFound(id)))
    }
}

fn parse_id(raw: &str) -> Result<u32, Failure> {
    raw.parse()
        .map_err(|_| Failure::type_mismatch(raw, "id", "u32"))
}

// Concrete envelope shapes for OpenAPI generation
/// Envelope carrying one item
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub status: u16,
    pub trace_id: Uuid,
    pub message: String,
    pub content: Option<Item>,
    pub timestamp: DateTime<Utc>,
}

/// Envelope carrying a list of items
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemListResponse {
    pub status: u16,
    pub trace_id: Uuid,
    pub message: String,
    pub content: Option<Vec<Item>>,
    pub timestamp: DateTime<Utc>,
}

/// Envelope carrying a single text value
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextResponse {
    pub status: u16,
    pub trace_id: Uuid,
    pub message: String,
    pub content: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Envelope carrying a count
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountResponse {
    pub status: u16,
    pub trace_id: Uuid,
    pub message: String,
    pub content: Option<u32>,
    pub timestamp: DateTime<Utc>,
}

/// Envelope without content
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: u16,
    pub trace_id: Uuid,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// One page of items
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemPage {
    /// Always 200
    pub status: u16,
    /// Always "Success"
    pub message: String,
    /// Items of the requested page
    pub content: Vec<Item>,
    /// Page number, starting at 1
    pub page: u32,
    /// Requested page size
    pub size: u32,
    /// Items across all pages
    pub total_elements: u64,
    /// Number of pages
    pub total_pages: u64,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = serde_json::Value)
    )
)]
pub async fn health(trace: TraceContext) -> ApiResponse<Value> {
    ApiResponse::success_with(
        &trace,
        "Service is healthy",
        json!({
            "status": "healthy",
            "service": "api-response",
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// List catalog items, paginated in memory
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    params(PageParams),
    responses(
        (status = 200, description = "One page of items", body = ItemPage),
        (status = 400, description = "Invalid page parameters", body = ProblemReport)
    )
)]
pub async fn list_items(State(state): State<AppState>, page: PageParams) -> PagedResponse<Item> {
    debug!(page = ?page.page, size = ?page.size, "Listing items");
    page.slice(state.catalog.clone())
}

/// List catalog items the way a LIMIT/OFFSET backed store would
#[utoipa::path(
    get,
    path = "/items/external",
    tag = "items",
    params(PageParams),
    responses(
        (status = 200, description = "One page of items", body = ItemPage),
        (status = 400, description = "Invalid page parameters", body = ProblemReport)
    )
)]
pub async fn list_items_external(
    State(state): State<AppState>,
    page: PageParams,
) -> PagedResponse<Item> {
    let (offset, limit) = page.offset_limit();
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);

    let fetched: Vec<Item> = state
        .catalog
        .iter()
        .skip(offset)
        .take(limit as usize)
        .cloned()
        .collect();
    let total = state.catalog.len() as u64;

    page.external(fetched, total)
}

/// Items priced within `[min_price, max_price]`
#[utoipa::path(
    get,
    path = "/items/search",
    tag = "items",
    params(
        ("min_price" = u32, Query, description = "Lowest price in cents"),
        ("max_price" = Option<u32>, Query, description = "Highest price in cents")
    ),
    responses(
        (status = 200, description = "Matching items", body = ItemListResponse),
        (status = 400, description = "Missing or invalid price bound", body = ProblemReport)
    )
)]
pub async fn search_items(
    State(state): State<AppState>,
    trace: TraceContext,
    params: QueryParams,
) -> Result<ApiResponse<Vec<Item>>, Failure> {
    let min_price: u32 = params.required("min_price")?;
    let max_price: Option<u32> = params.optional("max_price")?;

    let matches: Vec<Item> = state
        .catalog
        .iter()
        .filter(|item| item.price >= min_price && max_price.map_or(true, |max| item.price <= max))
        .cloned()
        .collect();

    Ok(ApiResponse::success_with(
        &trace,
        format!("Found {} item(s)", matches.len()),
        matches,
    ))
}

/// Get a single item
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = u32, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Item found", body = ItemResponse),
        (status = 400, description = "Id is not a number", body = ProblemReport),
        (status = 404, description = "Item not found", body = ProblemReport)
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    trace: TraceContext,
    Path(raw_id): Path<String>,
) -> Result<ApiResponse<Item>, Failure> {
    let item = state.find(parse_id(&raw_id)?)?;
    Ok(ApiResponse::success_with(&trace, "Item found", item.clone()))
}

/// Owner of an item; unclaimed items are an internal fault
#[utoipa::path(
    get,
    path = "/items/{id}/owner",
    tag = "items",
    params(
        ("id" = u32, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Owner found", body = TextResponse),
        (status = 404, description = "Item not found", body = ProblemReport),
        (status = 500, description = "Item has no owner", body = ProblemReport)
    )
)]
pub async fn get_item_owner(
    State(state): State<AppState>,
    trace: TraceContext,
    Path(raw_id): Path<String>,
) -> Result<ApiResponse<String>, Failure> {
    let item = state.find(parse_id(&raw_id)?)?;
    let owner = item.owner.clone().or_null_reference("item.owner")?;
    Ok(ApiResponse::success_with(&trace, "Owner found", owner))
}

/// Validate and echo a new item
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body = NewItem,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Validation failed", body = ProblemReport),
        (status = 415, description = "Body is not JSON", body = ProblemReport)
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    trace: TraceContext,
    ApiJson(new_item): ApiJson<NewItem>,
) -> Result<ApiResponse<Item>, Failure> {
    let (name, price) = new_item.validate()?;
    let id = u32::try_from(state.catalog.len())
        .context("catalog is too large to assign an id")?
        + 1;

    info!(id, name = %name, "Item created");
    Ok(ApiResponse::created(
        &trace,
        "Item created",
        Item {
            id,
            name,
            price,
            owner: None,
        },
    ))
}

/// Queue an item for archiving
#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = u32, Path, description = "Item id")
    ),
    responses(
        (status = 202, description = "Archiving scheduled", body = StatusResponse),
        (status = 404, description = "Item not found", body = ProblemReport)
    )
)]
pub async fn archive_item(
    State(state): State<AppState>,
    trace: TraceContext,
    Path(raw_id): Path<String>,
) -> Result<ApiResponse<()>, Failure> {
    let item = state.find(parse_id(&raw_id)?)?;
    info!(id = item.id, "Archive requested");
    Ok(ApiResponse::status_only(
        &trace,
        format!("Archiving of item {} scheduled", item.id),
        StatusCode::ACCEPTED,
    ))
}

/// Stock level from the inventory feed, which is never parseable here
#[utoipa::path(
    get,
    path = "/items/stock",
    tag = "items",
    responses(
        (status = 200, description = "Stock level", body = CountResponse),
        (status = 500, description = "Inventory feed unreadable", body = ProblemReport)
    )
)]
pub async fn get_stock(trace: TraceContext) -> Result<ApiResponse<u32>, Failure> {
    let feed = "n/a";
    let stock: u32 = feed
        .parse()
        .context("failed to parse stock level from inventory feed")?;
    Ok(ApiResponse::success_with(&trace, "Stock level", stock))
}
