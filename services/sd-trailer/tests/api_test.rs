//! HTTP 路由测试（tower oneshot，内存存储）

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use common::{trailer_spec, TestApp};
use sd_trailer::api::{router, ROLE_HEADER, WAREHOUSE_HEADER};
use sd_trailer::domain::entities::ContractTerms;
use serde_json::{json, Value};
use tower::ServiceExt;

fn request(method: Method, uri: &str, role: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(role) = role {
        builder = builder.header(ROLE_HEADER, role);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

#[tokio::test]
async fn test_missing_role_is_unauthenticated() {
    let app = TestApp::new();
    let routes = router(app.state.clone());

    let (status, _) = send(&routes, request(Method::GET, "/api/v1/items", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&routes, request(Method::GET, "/api/v1/items", Some("guest"), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_manager_cannot_create_warehouse() {
    let app = TestApp::new();
    let routes = router(app.state.clone());

    let (status, body) = send(
        &routes,
        request(
            Method::POST,
            "/api/v1/warehouses",
            Some("manager"),
            Some(json!({ "name": "Алматы" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], 403);

    let (status, body) = send(
        &routes,
        request(
            Method::POST,
            "/api/v1/warehouses",
            Some("admin"),
            Some(json!({ "name": "Алматы" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].is_string());
}

#[tokio::test]
async fn test_item_and_trailer_flow() {
    let app = TestApp::new();
    let wh = app.warehouse("Алматы").await;
    let routes = router(app.state.clone());

    let (status, _) = send(
        &routes,
        request(
            Method::POST,
            "/api/v1/items",
            Some("admin"),
            Some(json!({
                "item_type": "TRAILER",
                "article": "MZSA-817",
                "name": "Прицеп МЗСА 817",
                "size_body": "3000x1500",
                "axle_count": 1,
                "wheel_radius": "R13",
                "board_height_mm": 400,
                "has_jockey_wheel": true
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, item) = send(
        &routes,
        request(
            Method::POST,
            "/api/v1/catalog/match",
            Some("admin"),
            Some(json!({ "axle_count": 1, "board_height_mm": "400", "jockey_wheel": true, "tent_height_mm": 0 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["article"], "MZSA-817");

    let (status, _) = send(
        &routes,
        request(
            Method::POST,
            "/api/v1/catalog/match",
            Some("admin"),
            Some(json!({ "axle_count": 2, "jockey_wheel": true })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = send(
        &routes,
        request(
            Method::POST,
            "/api/v1/trailers",
            Some("admin"),
            Some(json!({
                "vin": "y3ka00002r0000123",
                "warehouse_id": wh.0,
                "size_body": "3000x1500",
                "axle_count": 1,
                "wheel_radius": "R13",
                "board_height_mm": "400",
                "jockey_wheel": true
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].is_string());

    let list_request = Request::builder()
        .uri("/api/v1/trailers?vin=R0000")
        .header(ROLE_HEADER, "manager")
        .header(WAREHOUSE_HEADER, wh.0.to_string())
        .body(Body::empty())
        .unwrap();
    let (status, trailers) = send(&routes, list_request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trailers.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_signing_precondition_maps_to_412() {
    let app = TestApp::new();
    app.item(trailer_spec("MZSA-817", None)).await;
    let wh = app.warehouse("Алматы").await;
    let trailer = app.trailer("VIN1", wh).await;
    let contract_id = app.contract(trailer, Some("3"), ContractTerms::default()).await;
    let routes = router(app.state.clone());

    let uri = format!("/api/v1/contracts/{}/sigex/status", contract_id);
    let (status, _) = send(&routes, request(Method::GET, &uri, Some("manager"), None)).await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert!(app.remote.calls().is_empty());

    let uri = format!("/api/v1/contracts/{}/sigex/preregister", contract_id);
    let (status, body) = send(&routes, request(Method::POST, &uri, Some("manager"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["document_id"], "doc-1");

    let (status, body) = send(
        &routes,
        request(Method::GET, "/api/v1/contracts/next-number", Some("manager"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contract_number"], "4");
}
