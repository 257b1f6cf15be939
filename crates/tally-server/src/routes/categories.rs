use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use tally_core::error::AppError;

use crate::auth::AuthUser;
use crate::dto::{CategoryRequest, CategoryResponse};
use crate::error::ApiError;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/v1/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Bad request", body = crate::dto::ErrorResponse),
        (status = 409, description = "Name already taken", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "categories"
)]
pub async fn create(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    axum::Json(body): axum::Json<CategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;
    let name = body.normalized_name();

    let repo = state.db.category_repo();
    if repo.find_by_name(name).await?.is_some() {
        return Err(AppError::Conflict(format!("Category '{name}' already exists")).into());
    }

    let category = repo.create(name).await?;
    Ok((StatusCode::CREATED, axum::Json(CategoryResponse::from(category))))
}

#[utoipa::path(
    get,
    path = "/v1/categories",
    responses(
        (status = 200, description = "All categories", body = [CategoryResponse]),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "categories"
)]
pub async fn list(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state.db.category_repo().list().await?;
    let response: Vec<CategoryResponse> = categories.into_iter().map(Into::into).collect();
    Ok(axum::Json(response))
}

#[utoipa::path(
    get,
    path = "/v1/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category details", body = CategoryResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "categories"
)]
pub async fn get(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .db
        .category_repo()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category not found: {id}")))?;

    Ok(axum::Json(CategoryResponse::from(category)))
}

#[utoipa::path(
    put,
    path = "/v1/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category renamed", body = CategoryResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 409, description = "Name already taken", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "categories"
)]
pub async fn update(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    axum::Json(body): axum::Json<CategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;
    let name = body.normalized_name();

    let repo = state.db.category_repo();
    // Renaming onto another category's name is a conflict; renaming onto
    // the current name is a no-op and allowed.
    if let Some(existing) = repo.find_by_name(name).await? {
        if existing.id != id {
            return Err(AppError::Conflict(format!("Category '{name}' already exists")).into());
        }
    }

    let category = repo
        .update(id, name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category not found: {id}")))?;

    Ok(axum::Json(CategoryResponse::from(category)))
}

#[utoipa::path(
    delete,
    path = "/v1/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Deleted category", body = CategoryResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 409, description = "Category still has products", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "categories"
)]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = state.db.category_repo();
    let category = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category not found: {id}")))?;

    let count = repo.product_count(id).await?;
    if count > 0 {
        return Err(AppError::Conflict(format!(
            "Cannot delete category with {count} associated product(s); remove them first"
        ))
        .into());
    }

    repo.delete(id).await?;
    Ok(axum::Json(CategoryResponse::from(category)))
}
