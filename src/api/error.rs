use axum::{http::StatusCode, Json};
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Helper to log error and return generic internal server error
pub fn internal_error<E: std::fmt::Display>(err: E) -> ApiError {
    error!("Internal error: {}", err);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

/// Reject a request whose parameters are out of range
pub fn bad_request<E: std::fmt::Display>(err: E) -> ApiError {
    warn!("Bad request: {}", err);
    error_response(StatusCode::BAD_REQUEST, err.to_string())
}

/// No dataset has been loaded yet, or the last load failed
pub fn service_unavailable(message: &str) -> ApiError {
    warn!("Service unavailable: {}", message);
    error_response(StatusCode::SERVICE_UNAVAILABLE, message)
}

/// An upstream data source could not be fetched
pub fn bad_gateway<E: std::fmt::Display>(err: E) -> ApiError {
    error!("Upstream error: {}", err);
    error_response(StatusCode::BAD_GATEWAY, err.to_string())
}
