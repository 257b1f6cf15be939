use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use tally_core::error::AppError;

use crate::auth::AuthUser;
use crate::dto::{ProductRequest, ProductResponse};
use crate::error::ApiError;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/v1/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Bad request", body = crate::dto::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "products"
)]
pub async fn create(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    axum::Json(body): axum::Json<ProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;

    if state
        .db
        .category_repo()
        .find_by_id(body.category_id)
        .await?
        .is_none()
    {
        return Err(
            AppError::NotFound(format!("Category not found: {}", body.category_id)).into(),
        );
    }

    let product = state.db.product_repo().create(&body.to_new_product()).await?;
    Ok((StatusCode::CREATED, axum::Json(ProductResponse::from(product))))
}

#[utoipa::path(
    get,
    path = "/v1/products",
    responses(
        (status = 200, description = "All products with their categories", body = [ProductResponse]),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "products"
)]
pub async fn list(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let products = state.db.product_repo().list().await?;
    let response: Vec<ProductResponse> = products.into_iter().map(Into::into).collect();
    Ok(axum::Json(response))
}

#[utoipa::path(
    get,
    path = "/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product details", body = ProductResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "products"
)]
pub async fn get(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .db
        .product_repo()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product not found: {id}")))?;

    Ok(axum::Json(ProductResponse::from(product)))
}

#[utoipa::path(
    put,
    path = "/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Bad request", body = crate::dto::ErrorResponse),
        (status = 404, description = "Product or category not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "products"
)]
pub async fn update(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    axum::Json(body): axum::Json<ProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;

    let products = state.db.product_repo();
    if products.find_by_id(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Product not found: {id}")).into());
    }
    if state
        .db
        .category_repo()
        .find_by_id(body.category_id)
        .await?
        .is_none()
    {
        return Err(
            AppError::NotFound(format!("Category not found: {}", body.category_id)).into(),
        );
    }

    let product = products
        .update(id, &body.to_new_product())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product not found: {id}")))?;

    Ok(axum::Json(ProductResponse::from(product)))
}

#[utoipa::path(
    delete,
    path = "/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Deleted product", body = ProductResponse),
        (status = 404, description = "Not found", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "products"
)]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = state.db.product_repo();
    // Capture the joined representation before the row goes away.
    let product = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product not found: {id}")))?;

    repo.delete(id).await?;
    Ok(axum::Json(ProductResponse::from(product)))
}
