//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or missing input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing, invalid or expired credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Valid identity without the required permission, or a banned account
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Route exists but not for this method
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Request body over the configured limit
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// A backing service is unreachable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl ApiError {
    /// Log an infrastructure failure and hide it behind a 500.
    ///
    /// ```ignore
    /// state.reports.list(scope).await.map_err(ApiError::internal("Failed to fetch reports"))?;
    /// ```
    pub fn internal(context: &'static str) -> impl FnOnce(anyhow::Error) -> ApiError {
        move |e| {
            error!("{}: {:#}", context, e);
            ApiError::InternalServerError
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
            ApiError::MethodNotAllowed => "Method not allowed".to_string(),
            ApiError::InternalServerError => "Internal server error".to_string(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
