//! Category API handlers.
//!
//! # Purpose
//! CRUD over the `categories` collection. Categories have no author, so only
//! admins can change them.
use crate::api::error::{ApiError, api_internal, api_store_error};
use crate::api::types::{CategoryListResponse, CategoryResponse, MessageResponse};
use crate::app::AppState;
use crate::model::{Category, CategoryCreateRequest, CategoryUpdateRequest, Entity};
use crate::store::{StoreResult, into_fields};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

const COLLECTION: &str = "categories";

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "categories",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "All categories", body = CategoryListResponse),
        (status = 401, description = "Missing or invalid token", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoryListResponse>, ApiError> {
    let documents = state
        .store
        .list(COLLECTION)
        .await
        .map_err(|err| api_internal("Failed to list categories", &err))?;
    let categories = documents
        .into_iter()
        .map(|document| document.into_model())
        .collect::<StoreResult<Vec<Category>>>()
        .map_err(|err| api_internal("Failed to list categories", &err))?;
    Ok(Json(CategoryListResponse::success(
        categories,
        "Categories successfully retrieved",
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    tag = "categories",
    security(("bearerAuth" = [])),
    params(("id" = String, Path, description = "Category identifier")),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 404, description = "Category not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_category(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let category: Category = state
        .store
        .get(COLLECTION, &id)
        .await
        .and_then(|document| document.into_model())
        .map_err(|err| api_store_error("Category", &id, err))?;
    Ok(Json(CategoryResponse::success(
        category,
        "Category retrieved successfully",
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "categories",
    security(("bearerAuth" = [])),
    request_body = CategoryCreateRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Profanity or validation failure", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<CategoryCreateRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let fields = into_fields(&body)
        .map_err(|err| api_internal("Failed to create category", &err))?;
    let category: Category = state
        .store
        .create(COLLECTION, fields)
        .await
        .and_then(|document| document.into_model())
        .map_err(|err| api_internal("Failed to create category", &err))?;
    tracing::info!(entity = %Entity::Categories, id = %category.id, "category created");
    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse::success(category, "Category created successfully")),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    tag = "categories",
    security(("bearerAuth" = [])),
    params(("id" = String, Path, description = "Category identifier")),
    request_body = CategoryUpdateRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 403, description = "Caller is not an admin", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_category(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<CategoryUpdateRequest>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let fields =
        into_fields(&body).map_err(|err| api_internal("Failed to update category", &err))?;
    let category: Category = state
        .store
        .update(COLLECTION, &id, fields)
        .await
        .and_then(|document| document.into_model())
        .map_err(|err| api_store_error("Category", &id, err))?;
    Ok(Json(CategoryResponse::success(
        category,
        "Category updated successfully",
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    tag = "categories",
    security(("bearerAuth" = [])),
    params(("id" = String, Path, description = "Category identifier")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 404, description = "Category not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_category(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .delete(COLLECTION, &id)
        .await
        .map_err(|err| api_store_error("Category", &id, err))?;
    Ok(Json(MessageResponse::success("Category successfully deleted")))
}
