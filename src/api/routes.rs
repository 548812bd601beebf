//! Router configuration for the API.
//!
//! This module provides centralized route registration, API documentation
//! and middleware configuration for the application.

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{global_error_handler, logging_middleware, request_id_middleware};
use crate::state::AppState;

/// Prefix shared by all user endpoints.
pub const API_PREFIX: &str = "/family/farm/demo";

/// Location of the generated OpenAPI document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. CORS
/// 2. Request ID middleware - generates/propagates request IDs
/// 3. Logging middleware - logs requests with request IDs
/// 4. Global error handler - normalizes error bodies, attaches request IDs
///
/// # Routes
/// - `/family/farm/demo/*` - User lookups
/// - `/health*` - Health probes
/// - `/swagger-ui` and `/api-docs/openapi.json` - API documentation
///
/// # Example
/// ```ignore
/// let router = create_router(AppState::default());
/// ```
pub fn create_router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest(API_PREFIX, handlers::users::user_routes())
        .merge(handlers::health::health_routes())
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, api))
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
