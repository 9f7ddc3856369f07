//! Handler tests for the Products domain
//!
//! These tests drive the domain router over in-memory infrastructure:
//! - Request deserialization and validation
//! - Response serialization and HTTP status codes
//! - JWT authentication and the Admin role guard
//! - Change-event publication on create/update

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use axum_helpers::JwtAuth;
use domain_products::*;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tower::ServiceExt; // For oneshot()

const SECRET: &str = "handler-test-secret";

/// Category provider stub that always resolves to the same name
struct StaticCategoryProvider(&'static str);

#[async_trait]
impl CategoryProvider for StaticCategoryProvider {
    async fn category_name<'a>(&self, _category_id: i32, _token: Option<&'a str>) -> String {
        self.0.to_string()
    }
}

/// Publisher that records events instead of talking to a broker
#[derive(Default)]
struct RecordingPublisher {
    events: Mutex<Vec<ProductChanged>>,
}

impl RecordingPublisher {
    fn recorded(&self) -> Vec<ProductChanged> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChangePublisher for RecordingPublisher {
    async fn publish_changed(&self, event: &ProductChanged) -> Result<(), amqp_bus::BusError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

fn test_app() -> (Router, Arc<RecordingPublisher>, JwtAuth) {
    let auth = JwtAuth::new(SECRET);
    let publisher = Arc::new(RecordingPublisher::default());

    let service = ProductService::new(
        InMemoryProductRepository::new(),
        StaticCategoryProvider("Electronics"),
    )
    .with_publisher(publisher.clone());

    (handlers::router(service, auth.clone()), publisher, auth)
}

fn admin_token(auth: &JwtAuth) -> String {
    auth.create_token("user-1", "Admin User", vec!["Admin".to_string()], 900)
        .unwrap()
}

fn customer_token(auth: &JwtAuth) -> String {
    auth.create_token("user-2", "Plain User", vec!["Customer".to_string()], 900)
        .unwrap()
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, uri: &str, token: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn keyboard_input() -> serde_json::Value {
    json!({
        "name": "Keyboard",
        "description": "Mechanical, tenkeyless",
        "price": "49.99",
        "stock": 10,
        "image_url": "https://cdn.example.com/keyboard.png",
        "category_id": 3
    })
}

#[tokio::test]
async fn test_create_returns_201_with_enriched_dto() {
    let (app, _, auth) = test_app();
    let token = admin_token(&auth);

    let response = app
        .oneshot(send_json("POST", "/", &token, &keyboard_input()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let product: ProductDto = json_body(response.into_body()).await;
    assert_eq!(product.id, 1);
    assert_eq!(product.name, "Keyboard");
    assert_eq!(product.price, Decimal::new(4999, 2));
    assert_eq!(product.stock, 10);
    assert_eq!(product.category_name, "Electronics");
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let (app, _, _) = test_app();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tampered_token_is_unauthorized() {
    let (app, _, _) = test_app();
    let other_issuer = JwtAuth::new("some-other-secret");
    let token = admin_token(&other_issuer);

    let response = app.oneshot(get("/", &token)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_requires_admin_role() {
    let (app, _, auth) = test_app();
    let token = customer_token(&auth);

    let response = app
        .oneshot(send_json("POST", "/", &token, &keyboard_input()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_reads_allowed_without_admin_role() {
    let (app, _, auth) = test_app();
    let token = customer_token(&auth);

    let response = app.oneshot(get("/", &token)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_then_get_round_trips() {
    let (app, _, auth) = test_app();
    let token = admin_token(&auth);

    let response = app
        .clone()
        .oneshot(send_json("POST", "/", &token, &keyboard_input()))
        .await
        .unwrap();
    let created: ProductDto = json_body(response.into_body()).await;

    let response = app
        .oneshot(get(&format!("/{}", created.id), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let fetched: ProductDto = json_body(response.into_body()).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_get_missing_returns_404() {
    let (app, _, auth) = test_app();
    let token = admin_token(&auth);

    let response = app.oneshot(get("/42", &token)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_validates_name_length() {
    let (app, _, auth) = test_app();
    let token = admin_token(&auth);

    let mut input = keyboard_input();
    input["name"] = json!("");

    let response = app
        .oneshot(send_json("POST", "/", &token, &input))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_validates_description_length() {
    let (app, _, auth) = test_app();
    let token = admin_token(&auth);

    let mut input = keyboard_input();
    input["description"] = json!("x".repeat(201));

    let response = app
        .oneshot(send_json("POST", "/", &token, &input))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_returns_204_and_applies_changes() {
    let (app, _, auth) = test_app();
    let token = admin_token(&auth);

    app.clone()
        .oneshot(send_json("POST", "/", &token, &keyboard_input()))
        .await
        .unwrap();

    let mut update = keyboard_input();
    update["name"] = json!("Keyboard Pro");
    update["price"] = json!("59.99");

    let response = app
        .clone()
        .oneshot(send_json("PUT", "/1", &token, &update))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get("/1", &token)).await.unwrap();
    let fetched: ProductDto = json_body(response.into_body()).await;
    assert_eq!(fetched.name, "Keyboard Pro");
    assert_eq!(fetched.price, Decimal::new(5999, 2));
}

#[tokio::test]
async fn test_update_missing_returns_404() {
    let (app, _, auth) = test_app();
    let token = admin_token(&auth);

    let response = app
        .oneshot(send_json("PUT", "/42", &token, &keyboard_input()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_then_delete_again() {
    let (app, _, auth) = test_app();
    let token = admin_token(&auth);

    app.clone()
        .oneshot(send_json("POST", "/", &token, &keyboard_input()))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/1")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/1")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_by_category_filters_products() {
    let (app, _, auth) = test_app();
    let token = admin_token(&auth);

    app.clone()
        .oneshot(send_json("POST", "/", &token, &keyboard_input()))
        .await
        .unwrap();

    let mut other = keyboard_input();
    other["name"] = json!("Desk");
    other["category_id"] = json!(7);
    app.clone()
        .oneshot(send_json("POST", "/", &token, &other))
        .await
        .unwrap();

    let response = app.oneshot(get("/byCategory/7", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let products: Vec<ProductDto> = json_body(response.into_body()).await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Desk");
}

#[tokio::test]
async fn test_by_category_empty_returns_404() {
    let (app, _, auth) = test_app();
    let token = admin_token(&auth);

    let response = app.oneshot(get("/byCategory/99", &token)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_change_events_published_for_create_and_update() {
    let (app, publisher, auth) = test_app();
    let token = admin_token(&auth);

    app.clone()
        .oneshot(send_json("POST", "/", &token, &keyboard_input()))
        .await
        .unwrap();

    let mut update = keyboard_input();
    update["price"] = json!("59.99");
    app.oneshot(send_json("PUT", "/1", &token, &update))
        .await
        .unwrap();

    let events = publisher.recorded();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].product_id, 1);
    assert_eq!(events[0].price, Decimal::new(4999, 2));
    // The update event snapshots the price at update time
    assert_eq!(events[1].price, Decimal::new(5999, 2));

    // The wire payload carries the identity snapshot and omits stock
    let payload = serde_json::to_value(&events[1]).unwrap();
    assert!(payload.get("stock").is_none());
    assert!(payload.get("productId").is_some());
}
