//! Registration and login

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{info, warn};

use crate::{
    error::{ApiError, ApiResult},
    extract::ApiJson,
    models::user::{AuthResponse, LoginRequest, NewUser, RegisterRequest, Role, UserResponse},
    state::AppState,
    validation::{non_blank, normalize_email, validate_email, validate_password},
};

fn credentials(
    email: Option<String>,
    password: Option<String>,
) -> ApiResult<(String, String)> {
    match (non_blank(email), password.filter(|p| !p.is_empty())) {
        (Some(email), Some(password)) => Ok((normalize_email(&email), password)),
        _ => Err(ApiError::BadRequest(
            "Email and password are required".to_string(),
        )),
    }
}

/// Register a new account with the USER role
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let (email, password) = credentials(payload.email, payload.password)?;
    validate_email(&email).map_err(ApiError::BadRequest)?;
    validate_password(&password).map_err(ApiError::BadRequest)?;

    let password_hash = state
        .passwords
        .hash(&password)
        .await
        .map_err(ApiError::internal("Failed to hash password"))?;

    let new_user = NewUser {
        email,
        full_name: non_blank(payload.full_name),
        password_hash,
        role: Role::User,
    };

    let user = state
        .users
        .create(&new_user)
        .await
        .map_err(ApiError::internal("Failed to create user"))?
        .ok_or_else(|| {
            ApiError::BadRequest("User already exists with this email".to_string())
        })?;

    let token = state
        .jwt
        .issue_token(user.id)
        .map_err(ApiError::internal("Failed to issue token"))?;

    info!("Registered user {}", user.id);
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserResponse::from(user),
        }),
    ))
}

/// Exchange email and password for a token
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let (email, password) = credentials(payload.email, payload.password)?;
    let invalid = || ApiError::Unauthorized("Invalid credentials".to_string());

    let user = state
        .users
        .find_by_email(&email)
        .await
        .map_err(ApiError::internal("Failed to look up user"))?;

    let Some(user) = user else {
        state.passwords.verify_dummy(&password).await;
        warn!("Login attempt for unknown account");
        return Err(invalid());
    };

    let verified = state
        .passwords
        .verify(&password, &user.password_hash)
        .await
        .map_err(ApiError::internal("Failed to verify password"))?;
    if !verified {
        warn!("Failed login for user {}", user.id);
        return Err(invalid());
    }

    if user.is_banned {
        warn!("Banned user {} attempted to log in", user.id);
        return Err(ApiError::Forbidden("Account is banned".to_string()));
    }

    let token = state
        .jwt
        .issue_token(user.id)
        .map_err(ApiError::internal("Failed to issue token"))?;

    info!("User {} logged in", user.id);
    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(user),
    }))
}
