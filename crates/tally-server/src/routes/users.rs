use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;

use tally_core::error::AppError;
use tally_core::models::{NewUser, UserUpdate};
use tally_core::password;

use crate::auth::AdminUser;
use crate::dto::{UserListResponse, UserRequest, UserResponse};
use crate::error::ApiError;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/v1/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Bad request", body = crate::dto::ErrorResponse),
        (status = 409, description = "Email already taken", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn create(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    axum::Json(body): axum::Json<UserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;
    let Some(plain_password) = &body.password else {
        return Err(AppError::Validation("password is required to create a user".into()).into());
    };

    let repo = state.db.user_repo();
    if repo.find_by_email(&body.email).await?.is_some() {
        return Err(AppError::Conflict(format!("Email '{}' already in use", body.email)).into());
    }

    let new_user = NewUser {
        fullname: body.fullname.trim().to_string(),
        email: body.email.clone(),
        salary: body.salary,
        admin: body.admin,
        active: body.active.unwrap_or(true),
        password_hash: password::hash(plain_password)?,
    };
    let user = repo.create(&new_user).await?;

    tracing::info!(email = %user.email, admin = user.admin, "created user");
    Ok((StatusCode::CREATED, axum::Json(UserResponse::from(user))))
}

#[utoipa::path(
    get,
    path = "/v1/users",
    responses(
        (status = 200, description = "All users", body = UserListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn list(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.db.user_repo().list().await?;
    let total = users.len();

    let response = UserListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
        total,
    };
    Ok(axum::Json(response))
}

#[utoipa::path(
    get,
    path = "/v1/users/{email}",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn get(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .user_repo()
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found: {email}")))?;

    Ok(axum::Json(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/v1/users/{email}",
    params(("email" = String, Path, description = "User email")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Bad request", body = crate::dto::ErrorResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 409, description = "Email already taken", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn update(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(email): Path<String>,
    axum::Json(body): axum::Json<UserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;

    let repo = state.db.user_repo();
    // Moving to another account's email is a conflict.
    if body.email != email && repo.find_by_email(&body.email).await?.is_some() {
        return Err(AppError::Conflict(format!("Email '{}' already in use", body.email)).into());
    }

    let update = UserUpdate {
        fullname: body.fullname.trim().to_string(),
        email: body.email.clone(),
        salary: body.salary,
        admin: body.admin,
        password_hash: body.password.as_deref().map(password::hash).transpose()?,
    };

    let user = repo
        .update(&email, &update)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found: {email}")))?;

    Ok(axum::Json(UserResponse::from(user)))
}

#[utoipa::path(
    patch,
    path = "/v1/users/{email}/deactivate",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "User deactivated", body = UserResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 409, description = "Already deactivated", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn deactivate(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = state.db.user_repo();
    let user = repo
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found: {email}")))?;

    if !user.active {
        return Err(AppError::Conflict(format!("User '{email}' is already deactivated")).into());
    }

    let user = repo
        .set_active(&email, false, Some(Utc::now()))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found: {email}")))?;

    tracing::info!(email = %email, "deactivated user");
    Ok(axum::Json(UserResponse::from(user)))
}

#[utoipa::path(
    patch,
    path = "/v1/users/{email}/reactivate",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "User reactivated", body = UserResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 409, description = "Already active", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn reactivate(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = state.db.user_repo();
    let user = repo
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found: {email}")))?;

    if user.active {
        return Err(AppError::Conflict(format!("User '{email}' is already active")).into());
    }

    let user = repo
        .set_active(&email, true, None)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found: {email}")))?;

    tracing::info!(email = %email, "reactivated user");
    Ok(axum::Json(UserResponse::from(user)))
}
