//! API service routes

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;

use crate::{error::ApiError, middleware::require_auth, state::AppState};

pub mod auth;
pub mod reports;
pub mod users;

/// Create the router for the API service
pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    let protected_routes = Router::new()
        .route(
            "/reports",
            get(reports::list_reports).post(reports::create_report),
        )
        .route("/reports/user-reports", get(reports::list_own_reports))
        .route("/reports/stats/overview", get(reports::report_stats))
        .route(
            "/reports/:id",
            get(reports::get_report)
                .put(reports::update_report)
                .delete(reports::delete_report),
        )
        .route("/users", get(users::list_users))
        .route("/users/count", get(users::count_users))
        .route("/users/profile", get(users::get_profile))
        .route("/users/:id/ban", put(users::set_ban_state))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected_routes)
        .fallback(route_not_found)
        .layer(middleware::map_response(method_not_allowed_as_json))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    match state.users.health_check().await {
        Ok(true) => Ok(Json(json!({
            "status": "ok",
            "service": "leakage-api"
        }))),
        Ok(false) => Err(ApiError::ServiceUnavailable(
            "Database unavailable".to_string(),
        )),
        Err(e) => {
            error!("Health check failed: {:#}", e);
            Err(ApiError::ServiceUnavailable(
                "Database unavailable".to_string(),
            ))
        }
    }
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

/// Give the router's bare 405 the JSON error body, keeping its `Allow` header
async fn method_not_allowed_as_json(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut json = ApiError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        json.headers_mut().insert(header::ALLOW, allow);
    }
    json
}
