//! User administration and profile handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::info;

use crate::{
    authz::{Action, Identity, authorize},
    error::{ApiError, ApiResult},
    extract::{ApiJson, parse_id},
    models::user::{BanRequest, UserCountResponse, UserResponse},
    state::AppState,
};

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<impl IntoResponse> {
    authorize(&identity, Action::ListUsers)?;

    let users = state
        .users
        .list()
        .await
        .map_err(ApiError::internal("Failed to fetch users"))?;

    Ok(Json(
        users.iter().map(UserResponse::from).collect::<Vec<_>>(),
    ))
}

pub async fn count_users(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<impl IntoResponse> {
    authorize(&identity, Action::CountUsers)?;

    let count = state
        .users
        .count()
        .await
        .map_err(ApiError::internal("Failed to count users"))?;

    Ok(Json(UserCountResponse { count }))
}

/// The caller's own account
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<impl IntoResponse> {
    authorize(&identity, Action::ReadProfile)?;

    let user = state
        .users
        .find_by_id(identity.id)
        .await
        .map_err(ApiError::internal("Failed to fetch profile"))?
        .ok_or_else(user_not_found)?;

    Ok(Json(UserResponse::from(user)))
}

/// Ban or unban an account; the owner is emailed when the flag flips
pub async fn set_ban_state(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<BanRequest>,
) -> ApiResult<impl IntoResponse> {
    authorize(&identity, Action::BanUser)?;

    let id = parse_id(&id, "user")?;
    let banned = payload
        .is_banned
        .ok_or_else(|| ApiError::BadRequest("is_banned must be a boolean".to_string()))?;

    let update = state
        .users
        .set_banned(id, banned)
        .await
        .map_err(ApiError::internal("Failed to update ban state"))?
        .ok_or_else(user_not_found)?;
    let user = update.user;

    info!(
        "User {} {} by {}",
        user.id,
        if banned { "banned" } else { "unbanned" },
        identity.email
    );

    if update.was_banned != banned {
        state.notifier.ban_state_changed(&user, banned).await;
    }

    Ok(Json(UserResponse::from(user)))
}
