use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;

use tally_core::error::AppError;
use tally_core::password;
use tally_core::token::TokenScope;

use crate::auth::AuthUser;
use crate::dto::{RefreshRequest, TokenRequest, TokenResponse, UserResponse};
use crate::error::ApiError;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/v1/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = crate::dto::ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn token(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<TokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.db.user_repo().find_by_email(&body.email).await?;

    // One generic rejection for unknown email, wrong password, and
    // deactivated accounts: no account enumeration through the login form.
    let Some(user) = user else {
        return Err(AppError::InvalidCredentials.into());
    };
    if !user.can_authenticate() || !password::verify(&body.password, &user.password_hash) {
        return Err(AppError::InvalidCredentials.into());
    }

    let access = state.tokens.issue_access(&user.email, user.admin)?;
    let refresh = state.tokens.issue_refresh(&user.email, user.admin)?;

    tracing::debug!(email = %user.email, "issued token pair");
    Ok(axum::Json(TokenResponse::bearer(access, refresh)))
}

#[utoipa::path(
    post,
    path = "/v1/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Fresh token pair issued", body = TokenResponse),
        (status = 401, description = "Invalid refresh token", body = crate::dto::ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<RefreshRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let claims = state
        .tokens
        .verify(&body.refresh_token, TokenScope::Refresh)?;

    // The account may have been deleted or deactivated since the refresh
    // token was issued; re-check before minting a new pair.
    let user = state
        .db
        .user_repo()
        .find_by_email(&claims.sub)
        .await?
        .ok_or(AppError::InvalidCredentials)?;
    if !user.can_authenticate() {
        return Err(AppError::InvalidCredentials.into());
    }

    let access = state.tokens.issue_access(&user.email, user.admin)?;
    let refresh = state.tokens.issue_refresh(&user.email, user.admin)?;

    Ok(axum::Json(TokenResponse::bearer(access, refresh)))
}

#[utoipa::path(
    get,
    path = "/v1/me",
    responses(
        (status = 200, description = "The authenticated user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = crate::dto::ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn me(AuthUser(user): AuthUser) -> impl IntoResponse {
    axum::Json(UserResponse::from(user))
}
