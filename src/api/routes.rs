//! Application route configuration.

use axum::{response::Json, routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use super::handlers::{health_routes, user_routes};
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(user_routes())
        .merge(health_routes())
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the generated OpenAPI document
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
