use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    archive_item, create_item, get_item, get_item_owner, get_stock, health, list_items,
    list_items_external, search_items, AppState,
};
use super::middleware::{
    no_route_fallback, panic_to_failure, problem_middleware, record_panic_locations,
    trace_id_middleware,
};
use super::openapi::ApiDoc;
use crate::config::ApiResponseConfig;
use crate::errors::ErrorTranslator;

/// Wire trace ids and failure translation onto `router`.
///
/// Trace ids are always assigned and handler panics always become 500
/// responses. When translation is enabled, unmatched paths get the not-found
/// fallback and every [`crate::errors::Failure`], panics included, becomes a
/// problem report; the fallback replaces any set earlier.
pub fn install<S>(router: Router<S>, config: &ApiResponseConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    record_panic_locations();
    let router = router.layer(CatchPanicLayer::custom(panic_to_failure));

    let router = if config.enabled {
        let translator = Arc::new(ErrorTranslator::new());
        router
            .fallback(no_route_fallback)
            .layer(middleware::from_fn_with_state(translator, problem_middleware))
    } else {
        router
    };

    router.layer(middleware::from_fn(trace_id_middleware))
}

pub fn create_router(state: AppState, config: &ApiResponseConfig) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        // Health check
        .route("/health", get(health))
        // Item endpoints
        .route("/items", get(list_items).post(create_item))
        .route("/items/external", get(list_items_external))
        .route("/items/search", get(search_items))
        .route("/items/stock", get(get_stock))
        .route("/items/:id", get(get_item).delete(archive_item))
        .route("/items/:id/owner", get(get_item_owner))
        // OpenAPI documentation
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state);

    install(router, config)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
