//! Integration tests for API endpoints.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot` over
//! in-memory SQLite and the in-process cache.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use tower::ServiceExt;

use user_registry::api::{create_router, AppState};
use user_registry::config::DatabaseConfig;
use user_registry::domain::{NewUser, User};
use user_registry::errors::{AppError, AppResult};
use user_registry::infra::{CachedUserRepository, Database, MemoryCache, UserStore};
use user_registry::services::{UserManager, UserService};

// =============================================================================
// Test Fixtures
// =============================================================================

async fn database() -> Arc<Database> {
    let db = Database::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    })
    .await
    .unwrap();
    Arc::new(db)
}

async fn app() -> Router {
    let database = database().await;
    let cache = Arc::new(MemoryCache::new(Duration::from_secs(60)));
    let store = Arc::new(UserStore::new(database.get_connection()));
    let repository = Arc::new(CachedUserRepository::new(store, cache.clone()));
    let service = Arc::new(UserManager::new(repository));

    create_router(AppState::new(service, cache, database))
}

/// Service whose store is permanently unreachable
struct BrokenService;

#[async_trait]
impl UserService for BrokenService {
    async fn create_user(&self, _user: NewUser) -> AppResult<i32> {
        Err(AppError::internal("connection refused"))
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Err(AppError::internal("connection refused"))
    }
}

async fn broken_app() -> Router {
    let cache = Arc::new(MemoryCache::new(Duration::from_secs(60)));
    create_router(AppState::new(Arc::new(BrokenService), cache, database().await))
}

fn post_user(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/user")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

const AL: &str = r#"{"name":"Al","password":"x","email":"a@x.com","age":21}"#;

// =============================================================================
// POST /user
// =============================================================================

#[tokio::test]
async fn test_create_user_returns_id_as_text() {
    let response = app().await.oneshot(post_user(AL)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_string(response).await, "1");
}

#[tokio::test]
async fn test_create_user_ignores_content_type() {
    let request = Request::builder()
        .method("POST")
        .uri("/user")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(AL))
        .unwrap();

    let response = app().await.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = app().await;

    for body in ["{not json", "", r#"{"name":"Al","age":"old"}"#] {
        let response = app.clone().oneshot(post_user(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body:?}");
        assert!(!body_string(response).await.is_empty());
    }
}

#[tokio::test]
async fn test_missing_field_takes_zero_value() {
    let app = app().await;
    let body = r#"{"name":"Al","email":"a@x.com","age":21}"#;

    let response = app.clone().oneshot(post_user(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(get("/users")).await.unwrap();
    let users: Vec<User> = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(users[0].password, "");
}

#[tokio::test]
async fn test_missing_age_fails_validation() {
    let response = app()
        .await
        .oneshot(post_user(r#"{"name":"Al"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_content_after_first_value_is_ignored() {
    let body = format!("{}\n{{\"name\":\"Bo\"}}", AL);

    let response = app().await.oneshot(post_user(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_string(response).await, "1");
}

#[tokio::test]
async fn test_minor_is_server_error() {
    let body = r#"{"name":"Al","password":"x","email":"a@x.com","age":17}"#;

    let response = app().await.oneshot(post_user(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_string(response).await.contains("18"));
}

#[tokio::test]
async fn test_duplicate_email_is_server_error() {
    let app = app().await;
    app.clone().oneshot(post_user(AL)).await.unwrap();

    let bo = r#"{"name":"Bo","password":"y","email":"a@x.com","age":30}"#;
    let response = app.oneshot(post_user(bo)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// GET /users
// =============================================================================

#[tokio::test]
async fn test_list_empty_is_json_array() {
    let response = app().await.oneshot(get("/users")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(body_string(response).await, "[]");
}

#[tokio::test]
async fn test_list_reflects_created_user() {
    let app = app().await;
    app.clone().oneshot(get("/users")).await.unwrap();
    app.clone().oneshot(post_user(AL)).await.unwrap();

    let response = app.oneshot(get("/users")).await.unwrap();
    let users: Vec<User> = serde_json::from_str(&body_string(response).await).unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, 1);
    assert_eq!(users[0].email, "a@x.com");
    assert_eq!(users[0].password, "x");
}

#[tokio::test]
async fn test_store_failure_is_plaintext_server_error() {
    let response = broken_app().await.oneshot(get("/users")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
}

// =============================================================================
// Routing and ambient endpoints
// =============================================================================

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let response = app().await.oneshot(get("/user")).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health_reports_dependencies() {
    let response = app().await.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
    assert_eq!(body["services"]["cache"]["status"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let response = app()
        .await
        .oneshot(get("/api-docs/openapi.json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(body["paths"]["/user"]["post"].is_object());
}
