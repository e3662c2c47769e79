//! Health check handler.

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::AppState;

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub services: ServiceHealth,
}

/// Individual service health status
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceHealth {
    pub database: ServiceStatus,
    pub cache: ServiceStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatus {
    #[schema(example = "healthy")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceStatus {
    fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                status: "healthy".to_string(),
                error: None,
            },
            Err(e) => Self {
                status: "unhealthy".to_string(),
                error: Some(e.to_string()),
            },
        }
    }

    fn is_healthy(&self) -> bool {
        self.error.is_none()
    }
}

/// Create health routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// Database and cache connectivity check
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "All dependencies reachable", body = HealthResponse),
        (status = 503, description = "At least one dependency is down", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = ServiceStatus::from_result(state.database.ping().await);
    let cache = ServiceStatus::from_result(state.cache.ping().await);

    let all_healthy = database.is_healthy() && cache.is_healthy();
    if !all_healthy {
        tracing::warn!(?database, ?cache, "Health check degraded");
    }

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        services: ServiceHealth { database, cache },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
