use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::Service;

use api_response::api::handlers::AppStateInner;
use api_response::api::routes::{create_router, install};
use api_response::config::ApiResponseConfig;
use api_response::errors::{
    APPLICATION_PROBLEM_JSON, INTERNAL_ERROR_DETAIL, MALFORMED_BODY_DETAIL, NULL_REFERENCE_DETAIL,
    VALIDATION_FAILED,
};
use api_response::models::seed_catalog;

// Helper to create test app
fn create_test_app_with(config: ApiResponseConfig) -> axum::Router {
    use std::sync::Arc;

    let state = Arc::new(AppStateInner {
        catalog: seed_catalog(57),
    });

    create_router(state, &config)
}

fn create_test_app() -> axum::Router {
    create_test_app_with(ApiResponseConfig::default())
}

// Helper to create an app whose only route panics
fn create_panicking_app(config: ApiResponseConfig) -> axum::Router {
    async fn unclaimed_owner() -> String {
        let owner: Option<String> = None;
        owner.unwrap()
    }

    install(
        axum::Router::new().route("/boom", axum::routing::get(unclaimed_owner)),
        &config,
    )
}

async fn send(app: &mut axum::Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.call(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap_or(json!({}));

    (status, headers, json)
}

// Helper to send request and parse JSON response
async fn send_json_request(app: &mut axum::Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let (status, _, json) = send(app, request).await;
    (status, json)
}

// Helper to send a raw body with the given content type
async fn send_body_request(
    app: &mut axum::Router,
    uri: &str,
    content_type: &str,
    body: impl Into<Body>,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type)
        .body(body.into())
        .unwrap();

    let (status, _, json) = send(app, request).await;
    (status, json)
}

// Helper to send JSON request with JSON body
async fn send_json_body_request(app: &mut axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let bytes = serde_json::to_vec(&body).unwrap();
    send_body_request(app, uri, "application/json", bytes).await
}

fn assert_problem_shape(body: &Value, status: u16) {
    assert_eq!(body["type"], "about:blank");
    assert_eq!(body["status"], status);
    assert!(body["title"].is_string());
    assert!(body["detail"].is_string());
    assert!(body["timestamp"].is_string());
    let trace_id = body["traceId"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(trace_id).is_ok());
}

#[tokio::test]
async fn test_health_endpoint() {
    let mut app = create_test_app();
    let (status, body) = send_json_request(&mut app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 200);
    assert_eq!(body["message"], "Service is healthy");
    assert_eq!(body["content"]["status"], "healthy");
    assert!(body["traceId"].is_string());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_list_items_default_page() {
    let mut app = create_test_app();
    let (status, body) = send_json_request(&mut app, "GET", "/items").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Success");
    assert_eq!(body["page"], 1);
    assert_eq!(body["size"], 10);
    assert_eq!(body["totalElements"], 57);
    assert_eq!(body["totalPages"], 6);
    assert_eq!(body["content"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_list_items_last_and_beyond() {
    let mut app = create_test_app();

    let (_, body) = send_json_request(&mut app, "GET", "/items?page=6&size=10").await;
    assert_eq!(body["content"].as_array().unwrap().len(), 7);
    assert_eq!(body["content"][0]["id"], 51);

    let (status, body) = send_json_request(&mut app, "GET", "/items?page=7&size=10").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["content"].as_array().unwrap().is_empty());
    assert_eq!(body["totalElements"], 57);
    assert_eq!(body["totalPages"], 6);
}

#[tokio::test]
async fn test_list_items_normalizes_bad_bounds() {
    let mut app = create_test_app();
    let (status, body) = send_json_request(&mut app, "GET", "/items?page=0&size=-5").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["size"], 10);
}

#[tokio::test]
async fn test_list_items_type_mismatch() {
    let mut app = create_test_app();
    let (status, body) = send_json_request(&mut app, "GET", "/items?page=abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_problem_shape(&body, 400);
    assert_eq!(
        body["detail"],
        "Invalid value 'abc' for parameter 'page'. Expected type: i32."
    );
}

#[tokio::test]
async fn test_external_pagination() {
    let mut app = create_test_app();
    let (status, body) = send_json_request(&mut app, "GET", "/items/external?page=2&size=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 2);
    assert_eq!(body["totalElements"], 57);
    assert_eq!(body["totalPages"], 6);
    let content = body["content"].as_array().unwrap();
    assert_eq!(content.len(), 10);
    assert_eq!(content[0]["id"], 11);
}

#[tokio::test]
async fn test_get_item() {
    let mut app = create_test_app();
    let (status, body) = send_json_request(&mut app, "GET", "/items/5").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 200);
    assert_eq!(body["content"]["id"], 5);
    assert_eq!(body["content"]["price"], 500);
}

#[tokio::test]
async fn test_get_item_not_found_is_domain_error() {
    let mut app = create_test_app();
    let request = Request::builder()
        .uri("/items/999")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(&mut app, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        APPLICATION_PROBLEM_JSON
    );
    assert_problem_shape(&body, 404);
    assert_eq!(body["title"], "Not Found");
    assert_eq!(body["detail"], "Item with id 999 was not found");
    assert_eq!(body["instance"], "/items/999");
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn test_get_item_with_non_numeric_id() {
    let mut app = create_test_app();
    let (status, body) = send_json_request(&mut app, "GET", "/items/abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["detail"],
        "Invalid value 'abc' for parameter 'id'. Expected type: u32."
    );
}

#[tokio::test]
async fn test_owner_present() {
    let mut app = create_test_app();
    let (status, body) = send_json_request(&mut app, "GET", "/items/3/owner").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "account-1");
}

#[tokio::test]
async fn test_owner_absent_is_null_reference() {
    let mut app = create_test_app();
    let (status, body) = send_json_request(&mut app, "GET", "/items/1/owner").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_problem_shape(&body, 500);
    assert_eq!(body["detail"], NULL_REFERENCE_DETAIL);
    assert!(!body.to_string().contains("item.owner"));
}

#[tokio::test]
async fn test_search_requires_min_price() {
    let mut app = create_test_app();
    let (status, body) = send_json_request(&mut app, "GET", "/items/search").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["detail"],
        "Required request parameter 'min_price' (type: u32) is missing."
    );
}

#[tokio::test]
async fn test_search_by_price_range() {
    let mut app = create_test_app();
    let (status, body) =
        send_json_request(&mut app, "GET", "/items/search?min_price=5000&max_price=5200").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Found 3 item(s)");
    let ids: Vec<u64> = body["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![50, 51, 52]);
}

#[tokio::test]
async fn test_create_item() {
    let mut app = create_test_app();
    let (status, body) =
        send_json_body_request(&mut app, "/items", json!({"name": "Lamp", "price": 1500})).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], 201);
    assert_eq!(body["message"], "Item created");
    assert_eq!(body["content"]["id"], 58);
    assert_eq!(body["content"]["name"], "Lamp");
}

#[tokio::test]
async fn test_create_item_validation_failure() {
    let mut app = create_test_app();
    let (status, body) = send_json_body_request(&mut app, "/items", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_problem_shape(&body, 400);
    assert_eq!(body["title"], "Bad Request");
    assert_eq!(body["detail"], VALIDATION_FAILED);

    let errors = body["errors"].as_object().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors.contains_key("name"));
    assert!(errors.contains_key("price"));
}

#[tokio::test]
async fn test_create_item_malformed_json() {
    let mut app = create_test_app();
    let (status, body) =
        send_body_request(&mut app, "/items", "application/json", r#"{"name": <b>"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], MALFORMED_BODY_DETAIL);
    assert!(!body.to_string().contains("<b>"));
}

#[tokio::test]
async fn test_create_item_unsupported_media_type() {
    let mut app = create_test_app();
    let (status, body) = send_body_request(&mut app, "/items", "text/plain", "name=Lamp").await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(
        body["detail"],
        "Content type 'text/plain' is not supported. Supported content types: [application/json]"
    );
}

#[tokio::test]
async fn test_method_not_allowed() {
    let mut app = create_test_app();
    let request = Request::builder()
        .method("PUT")
        .uri("/items")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(&mut app, request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(headers.get(header::ALLOW).is_some());
    assert_problem_shape(&body, 405);

    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Method 'PUT' is not supported for this endpoint."));
    assert!(detail.contains("GET"));
    assert!(detail.contains("POST"));
}

#[tokio::test]
async fn test_unknown_route() {
    let mut app = create_test_app();
    let (status, body) = send_json_request(&mut app, "GET", "/nope/nothing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_problem_shape(&body, 404);
    assert_eq!(
        body["detail"],
        "The requested resource '/nope/nothing' was not found."
    );
}

#[tokio::test]
async fn test_internal_error_is_generic() {
    let mut app = create_test_app();
    let (status, body) = send_json_request(&mut app, "GET", "/items/stock").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_problem_shape(&body, 500);
    assert_eq!(body["detail"], INTERNAL_ERROR_DETAIL);
    assert!(!body.to_string().contains("inventory"));
}

#[tokio::test]
async fn test_archive_item_accepted() {
    let mut app = create_test_app();
    let (status, body) = send_json_request(&mut app, "DELETE", "/items/2").await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], 202);
    assert_eq!(body["message"], "Archiving of item 2 scheduled");
    assert!(body.get("content").is_none());
}

#[tokio::test]
async fn test_each_request_gets_its_own_trace_id() {
    let mut app = create_test_app();
    let (_, first) = send_json_request(&mut app, "GET", "/items/999").await;
    let (_, second) = send_json_request(&mut app, "GET", "/items/999").await;

    assert_ne!(first["traceId"], second["traceId"]);
}

#[tokio::test]
async fn test_translation_disabled() {
    let mut app = create_test_app_with(ApiResponseConfig { enabled: false });

    let (status, body) = send_json_request(&mut app, "GET", "/items/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({}));

    let (status, body) = send_json_request(&mut app, "GET", "/items/5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["id"], 5);
}

#[tokio::test]
async fn test_panicking_handler_becomes_internal_problem() {
    let mut app = create_panicking_app(ApiResponseConfig::default());
    let request = Request::builder().uri("/boom").body(Body::empty()).unwrap();
    let (status, headers, body) = send(&mut app, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        APPLICATION_PROBLEM_JSON
    );
    assert_problem_shape(&body, 500);
    assert_eq!(body["detail"], INTERNAL_ERROR_DETAIL);
    assert_eq!(body["instance"], "/boom");
    assert!(!body.to_string().contains("panicked"));
}

#[tokio::test]
async fn test_panicking_handler_without_translation() {
    let mut app = create_panicking_app(ApiResponseConfig { enabled: false });
    let (status, body) = send_json_request(&mut app, "GET", "/boom").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({}));
}
