use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::startup::build_app;
use service::storage::MemStorage;

fn app() -> Router {
    build_app(Arc::new(MemStorage::new()))
}

async fn body_json(res: axum::response::Response) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn secure_test_defaults_to_dev_user() -> anyhow::Result<()> {
    let res = app()
        .oneshot(Request::builder().uri("/api/secure-test").body(Body::empty())?)
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await?;
    assert_eq!(body["message"], "This is a protected route");
    assert_eq!(body["userId"], "dev-user");
    Ok(())
}

#[tokio::test]
async fn secure_test_echoes_forwarded_identity() -> anyhow::Result<()> {
    let req = Request::builder()
        .uri("/api/secure-test")
        .header("x-user-id", "user_42")
        .body(Body::empty())?;
    let body = body_json(app().oneshot(req).await?).await?;
    assert_eq!(body["userId"], "user_42");
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> anyhow::Result<()> {
    let res = app()
        .oneshot(Request::builder().uri("/api-docs/openapi.json").body(Body::empty())?)
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await?;
    assert!(body["paths"]["/api/waste-pickups/{id}"].is_object());
    Ok(())
}

#[tokio::test]
async fn create_returns_201_with_record() -> anyhow::Result<()> {
    let req = Request::builder()
        .method("POST")
        .uri("/api/waste-pickups")
        .header("content-type", "application/json")
        .body(Body::from(json!({"fullName": "Jane Doe", "location": "Nairobi", "wasteType": "Organic", "preferredDate": ""}).to_string()))?;
    let res = app().oneshot(req).await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = body_json(res).await?;
    assert!(body["_id"].is_string());
    assert!(body["preferredDate"].is_null());
    Ok(())
}

#[tokio::test]
async fn wrong_field_type_is_bad_request() -> anyhow::Result<()> {
    let req = Request::builder()
        .method("POST")
        .uri("/api/waste-pickups")
        .header("content-type", "application/json")
        .body(Body::from(json!({"fullName": 7, "location": "Nairobi", "wasteType": "Organic"}).to_string()))?;
    let res = app().oneshot(req).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(res).await?["message"].is_string());
    Ok(())
}

#[tokio::test]
async fn unknown_id_is_404_with_message() -> anyhow::Result<()> {
    let res = app()
        .oneshot(Request::builder().uri("/api/waste-pickups/507f1f77bcf86cd799439011").body(Body::empty())?)
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(res).await?["message"], "Pickup not found");
    Ok(())
}
