use utoipa::OpenApi;

use crate::api::handlers::{
    CountResponse, ItemListResponse, ItemPage, ItemResponse, StatusResponse, TextResponse,
};
use crate::errors::ProblemReport;
use crate::models::{Item, NewItem};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "API Response Demo",
        version = "0.1.0",
        description = "Demo catalog showing uniform response envelopes, pagination and RFC 9457 problem reports with trace ids.",
    ),
    paths(
        crate::api::handlers::health,
        crate::api::handlers::list_items,
        crate::api::handlers::list_items_external,
        crate::api::handlers::search_items,
        crate::api::handlers::get_stock,
        crate::api::handlers::get_item,
        crate::api::handlers::get_item_owner,
        crate::api::handlers::create_item,
        crate::api::handlers::archive_item,
    ),
    components(
        schemas(
            Item,
            NewItem,
            ItemResponse,
            ItemListResponse,
            ItemPage,
            TextResponse,
            CountResponse,
            StatusResponse,
            ProblemReport,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "items", description = "Catalog item endpoints"),
    )
)]
pub struct ApiDoc;
