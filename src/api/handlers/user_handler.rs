//! User handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};

use crate::api::extractors::JsonBody;
use crate::api::AppState;
use crate::domain::{NewUser, User};
use crate::errors::AppResult;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user", post(create_user))
        .route("/users", get(list_users))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/user",
    tag = "Users",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created, body is the new id", body = String, content_type = "text/plain"),
        (status = 400, description = "Malformed request body"),
        (status = 500, description = "Validation or storage failure")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewUser>,
) -> AppResult<(StatusCode, String)> {
    let id = state.user_service.create_user(payload).await?;

    tracing::info!(id, "User created");
    Ok((StatusCode::CREATED, id.to_string()))
}

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All registered users", body = Vec<User>),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.user_service.list_users().await?;

    tracing::debug!(count = users.len(), "Users listed");
    Ok(Json(users))
}
