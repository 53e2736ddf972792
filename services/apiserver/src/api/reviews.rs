//! Review API handlers.
//!
//! # Purpose
//! CRUD over the `reviews` collection. Every route sits behind the gate
//! middleware, so handlers receive an admitted caller and, for writes, a body
//! that already passed the profanity and schema stages.
use crate::api::error::{ApiError, api_internal, api_store_error};
use crate::api::types::{MessageResponse, ReviewListResponse, ReviewResponse};
use crate::app::AppState;
use crate::model::{Entity, NewReview, Review, ReviewCreateRequest, ReviewUpdateRequest};
use crate::store::{StoreResult, into_fields};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use reviewhub_gate::Identity;

const COLLECTION: &str = "reviews";

#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    tag = "reviews",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "All reviews", body = ReviewListResponse),
        (status = 401, description = "Missing or invalid token", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_reviews(
    State(state): State<AppState>,
) -> Result<Json<ReviewListResponse>, ApiError> {
    let documents = state
        .store
        .list(COLLECTION)
        .await
        .map_err(|err| api_internal("Failed to list reviews", &err))?;
    let reviews = documents
        .into_iter()
        .map(|document| document.into_model())
        .collect::<StoreResult<Vec<Review>>>()
        .map_err(|err| api_internal("Failed to list reviews", &err))?;
    Ok(Json(ReviewListResponse::success(
        reviews,
        "Reviews successfully retrieved",
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews/{id}",
    tag = "reviews",
    security(("bearerAuth" = [])),
    params(("id" = String, Path, description = "Review identifier")),
    responses(
        (status = 200, description = "Review", body = ReviewResponse),
        (status = 404, description = "Review not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_review(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let review: Review = state
        .store
        .get(COLLECTION, &id)
        .await
        .and_then(|document| document.into_model())
        .map_err(|err| api_store_error("Review", &id, err))?;
    Ok(Json(ReviewResponse::success(
        review,
        "Review retrieved successfully",
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    tag = "reviews",
    security(("bearerAuth" = [])),
    request_body = ReviewCreateRequest,
    responses(
        (status = 201, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Profanity or validation failure", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_review(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Json(body): Json<ReviewCreateRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), ApiError> {
    let fields = into_fields(&NewReview::new(caller.id, body))
        .map_err(|err| api_internal("Failed to create review", &err))?;
    let review: Review = state
        .store
        .create(COLLECTION, fields)
        .await
        .and_then(|document| document.into_model())
        .map_err(|err| api_internal("Failed to create review", &err))?;
    tracing::info!(entity = %Entity::Reviews, id = %review.id, "review created");
    Ok((
        StatusCode::CREATED,
        Json(ReviewResponse::success(review, "Review created successfully")),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}",
    tag = "reviews",
    security(("bearerAuth" = [])),
    params(("id" = String, Path, description = "Review identifier")),
    request_body = ReviewUpdateRequest,
    responses(
        (status = 200, description = "Review updated", body = ReviewResponse),
        (status = 403, description = "Not an admin or the author", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Review not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_review(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<ReviewUpdateRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let fields =
        into_fields(&body).map_err(|err| api_internal("Failed to update review", &err))?;
    let review: Review = state
        .store
        .update(COLLECTION, &id, fields)
        .await
        .and_then(|document| document.into_model())
        .map_err(|err| api_store_error("Review", &id, err))?;
    Ok(Json(ReviewResponse::success(
        review,
        "Review updated successfully",
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    tag = "reviews",
    security(("bearerAuth" = [])),
    params(("id" = String, Path, description = "Review identifier")),
    responses(
        (status = 200, description = "Review deleted", body = MessageResponse),
        (status = 404, description = "Review not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_review(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .delete(COLLECTION, &id)
        .await
        .map_err(|err| api_store_error("Review", &id, err))?;
    Ok(Json(MessageResponse::success("Review successfully deleted")))
}
