//! Authentication middleware resolving bearer tokens into an [`Identity`]

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::{debug, warn};

use crate::{authz::Identity, error::ApiError, state::AppState};

/// Authentication middleware
///
/// The role and ban flag come from the stored user on every request, so a ban
/// or role change applies to tokens that were issued earlier.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| {
            warn!("Request to {} without bearer token", req.uri().path());
            ApiError::Unauthorized("Access token required".to_string())
        })?;

    let claims = state.jwt.validate_token(bearer.token()).map_err(|e| {
        warn!("Rejected token: {}", e);
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await
        .map_err(ApiError::internal("Failed to resolve token subject"))?
        .ok_or_else(|| {
            warn!("Token subject {} no longer exists", claims.sub);
            ApiError::Unauthorized("User not found".to_string())
        })?;

    if user.is_banned {
        warn!("Banned user {} attempted access", user.id);
        return Err(ApiError::Forbidden("User account is banned".to_string()));
    }

    debug!("Authenticated {} as {} ({})", user.id, user.email, user.role);
    req.extensions_mut().insert(Identity::from(&user));

    Ok(next.run(req).await)
}
