//! Health check endpoint handlers.
//!
//! This module provides health check functionality for monitoring
//! and load balancer probes. The only dependency worth checking is the
//! user store, which must hold at least one record to serve lookups.

use std::collections::BTreeMap;

use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{ComponentHealth, HealthResponse, HealthStatus};
use crate::state::AppState;

/// Creates health check routes.
///
/// # Routes
/// - `GET /health` - Basic health check
/// - `GET /health/ready` - Readiness probe
/// - `GET /health/live` - Liveness probe
pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(readiness_check))
        .routes(routes!(liveness_check))
}

/// Basic health check endpoint.
///
/// # Responses
/// - `200 OK` - Service is healthy
/// - `503 Service Unavailable` - Service is unhealthy, body still carries the checks
///
/// # Example Response
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "timestamp": "2025-04-25T06:00:00Z",
///   "checks": {
///     "user_store": {
///       "status": "healthy",
///       "message": "2 users loaded"
///     }
///   }
/// }
/// ```
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let mut checks = BTreeMap::new();
    checks.insert("user_store".to_string(), check_user_store(&state));

    let response = HealthResponse::from_checks(crate::pkg_version().to_string(), checks);
    let status = match response.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(response))
}

/// Readiness probe endpoint.
///
/// # Responses
/// - `200 OK` - Service is ready
/// - `503 Service Unavailable` - User store is empty
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready")
    ),
    tag = HEALTH_TAG
)]
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match check_user_store(&state).status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Liveness probe endpoint.
///
/// Lightweight, never touches the user store.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive")
    ),
    tag = HEALTH_TAG
)]
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

fn check_user_store(state: &AppState) -> ComponentHealth {
    let count = state.services.users.count();
    if count == 0 {
        ComponentHealth {
            status: HealthStatus::Unhealthy,
            message: Some("No users loaded".to_string()),
        }
    } else {
        ComponentHealth {
            status: HealthStatus::Healthy,
            message: Some(format!("{count} users loaded")),
        }
    }
}
