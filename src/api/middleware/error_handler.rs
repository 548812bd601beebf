//! Error handler for converting AppError to HTTP responses.
//!
//! Implements `IntoResponse` for `AppError`, maps extractor rejections
//! to the same JSON shape, and normalizes any other error response
//! leaving the router.

use axum::{
    Json,
    body::{Body, Bytes},
    extract::{
        Request,
        rejection::{PathRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

/// Upper bound on error bodies read back by the global handler
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

impl IntoResponse for AppError {
    /// # Status Code Mapping
    /// - IndexOutOfRange → 500 INTERNAL_SERVER_ERROR
    /// - NotFound → 404 NOT_FOUND
    /// - Validation, BadRequest → 400 BAD_REQUEST
    /// - Configuration, Internal → 500 INTERNAL_SERVER_ERROR
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let code = error_to_code(&self);

        let error_response = match &self {
            AppError::IndexOutOfRange { index, len } => ErrorResponse::new(
                code,
                &format!("Index {} out of bounds for length {}", index, len),
            )
            .with_details(json!({ "index": index, "len": len })),
            AppError::NotFound {
                entity,
                field,
                value,
            } => ErrorResponse::new(code, &format!("{} with {}={} not found", entity, field, value))
                .with_details(json!({ "entity": entity, "field": field, "value": value })),
            AppError::Validation { field, reason } => {
                ErrorResponse::new(code, reason).with_details(json!({ "field": field }))
            }
            AppError::BadRequest { message } => ErrorResponse::new(code, message),
            AppError::Configuration { key, .. } => {
                ErrorResponse::new(code, &format!("Configuration error: {}", key))
                    .with_details(json!({ "key": key }))
            }
            AppError::Internal { source } => {
                tracing::error!(error = %source, "Internal error");
                ErrorResponse::new(code, "An internal error occurred")
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::IndexOutOfRange { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Validation { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

/// Converts axum path rejection errors to ErrorResponse.
pub fn handle_path_rejection(rejection: PathRejection) -> Response {
    let error_response = match rejection {
        PathRejection::FailedToDeserializePathParams(err) => {
            ErrorResponse::new("INVALID_PATH_PARAMS", "Invalid path parameters")
                .with_details(json!({ "error": err.body_text() }))
        }
        PathRejection::MissingPathParams(err) => {
            ErrorResponse::new("MISSING_PATH_PARAMS", "Missing required path parameters")
                .with_details(json!({ "error": err.body_text() }))
        }
        _ => ErrorResponse::new("PATH_ERROR", "Invalid path parameters"),
    };

    (StatusCode::BAD_REQUEST, Json(error_response)).into_response()
}

/// Converts axum query rejection errors to ErrorResponse.
pub fn handle_query_rejection(rejection: QueryRejection) -> Response {
    let error_response = match rejection {
        QueryRejection::FailedToDeserializeQueryString(err) => {
            ErrorResponse::new("INVALID_QUERY_PARAMS", "Invalid query parameters")
                .with_details(json!({ "error": err.body_text() }))
        }
        _ => ErrorResponse::new("QUERY_ERROR", "Invalid query parameters"),
    };

    (StatusCode::BAD_REQUEST, Json(error_response)).into_response()
}

/// Middleware that gives every error response the `ErrorResponse` shape.
///
/// JSON error bodies produced by handlers get the request ID attached;
/// plain or empty error bodies (unknown route, wrong method) are replaced.
/// Must run inside `request_id_middleware`.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().map(|r| r.0.clone());

    let response = next.run(request).await;
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    let (mut parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, MAX_ERROR_BODY_BYTES)
        .await
        .unwrap_or_else(|_| Bytes::new());

    let parsed = if is_json {
        serde_json::from_slice::<ErrorResponse>(&body_bytes).ok()
    } else {
        None
    };

    let mut error_response = match parsed {
        Some(error_response) => error_response,
        None if is_json => {
            // Foreign JSON body, leave it untouched
            return Response::from_parts(parts, Body::from(body_bytes));
        }
        None => status_error_response(status, String::from_utf8_lossy(&body_bytes).trim()),
    };

    if error_response.request_id.is_none()
        && let Some(id) = request_id
    {
        error_response = error_response.with_request_id(&id);
    }

    let body = match serde_json::to_vec(&error_response) {
        Ok(body) => body,
        Err(_) => return Response::from_parts(parts, Body::from(body_bytes)),
    };
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Response::from_parts(parts, Body::from(body))
}

/// Builds an ErrorResponse for a bare status, keeping the original text when present.
fn status_error_response(status: StatusCode, original_message: &str) -> ErrorResponse {
    let (code, fallback) = match status {
        StatusCode::BAD_REQUEST => ("BAD_REQUEST", "Bad request - invalid or malformed request"),
        StatusCode::NOT_FOUND => ("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => (
            "METHOD_NOT_ALLOWED",
            "HTTP method not allowed for this endpoint",
        ),
        StatusCode::REQUEST_TIMEOUT => ("REQUEST_TIMEOUT", "Request timeout"),
        StatusCode::SERVICE_UNAVAILABLE => {
            ("SERVICE_UNAVAILABLE", "Service temporarily unavailable")
        }
        s if s.is_server_error() => ("INTERNAL_SERVER_ERROR", "An internal server error occurred"),
        _ => ("UNKNOWN_ERROR", "An unknown error occurred"),
    };

    let message = if original_message.is_empty() {
        fallback
    } else {
        original_message
    };
    ErrorResponse::new(code, message)
}
