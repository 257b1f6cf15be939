use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use tally_core::error::AppError;
use tally_core::models::User;
use tally_core::token::TokenScope;

use crate::error::ApiError;
use crate::state::AppState;

/// Axum extractor that validates a `Bearer` access token and loads the
/// account behind it. Add this as a handler parameter to require
/// authentication.
///
/// The active flag is re-checked on every request: deactivating a user
/// invalidates their outstanding tokens immediately.
pub struct AuthUser(pub User);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::TokenError("missing Authorization header".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::TokenError("expected Bearer authorization".into()))?;

        let claims = state.tokens.verify(token, TokenScope::Access)?;

        let user = state
            .db
            .user_repo()
            .find_by_email(&claims.sub)
            .await?
            .ok_or_else(|| AppError::TokenError("unknown account".into()))?;

        if !user.can_authenticate() {
            return Err(AppError::TokenError("account is deactivated".into()).into());
        }

        Ok(AuthUser(user))
    }
}

/// Axum extractor that additionally requires the admin flag.
/// Returns 403 for authenticated non-admin callers.
pub struct AdminUser(pub User);

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Forbidden("admin access required".into()).into());
        }
        Ok(AdminUser(user))
    }
}
