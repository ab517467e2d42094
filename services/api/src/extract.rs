//! Request extractors that reject with the API's JSON error body

use axum::{
    Json, async_trait,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::ApiError;

/// `axum::Json` whose rejections become `400 {"error": ...}`, or 413 for an
/// oversized body
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let message = format!("Invalid request body: {}", rejection.body_text());
                match rejection.status() {
                    StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(message),
                    _ => ApiError::BadRequest(message),
                }
            })?;

        Ok(ApiJson(value))
    }
}

/// Parse a path identifier, naming the resource in the error message
pub fn parse_id(raw: &str, resource: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::BadRequest(format!("Invalid {} ID format", resource)))
}
