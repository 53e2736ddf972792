//! Comment API handlers.
//!
//! # Purpose
//! CRUD over the `comments` collection, gated like reviews. New comments
//! record the caller as their author.
use crate::api::error::{ApiError, api_internal, api_store_error};
use crate::api::types::{CommentListResponse, CommentResponse, MessageResponse};
use crate::app::AppState;
use crate::model::{Comment, CommentCreateRequest, CommentUpdateRequest, Entity, NewComment};
use crate::store::{StoreResult, into_fields};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use reviewhub_gate::Identity;

const COLLECTION: &str = "comments";

#[utoipa::path(
    get,
    path = "/api/v1/comments",
    tag = "comments",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "All comments", body = CommentListResponse),
        (status = 401, description = "Missing or invalid token", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_comments(
    State(state): State<AppState>,
) -> Result<Json<CommentListResponse>, ApiError> {
    let documents = state
        .store
        .list(COLLECTION)
        .await
        .map_err(|err| api_internal("Failed to list comments", &err))?;
    let comments = documents
        .into_iter()
        .map(|document| document.into_model())
        .collect::<StoreResult<Vec<Comment>>>()
        .map_err(|err| api_internal("Failed to list comments", &err))?;
    Ok(Json(CommentListResponse::success(
        comments,
        "Comments successfully retrieved",
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/comments/{id}",
    tag = "comments",
    security(("bearerAuth" = [])),
    params(("id" = String, Path, description = "Comment identifier")),
    responses(
        (status = 200, description = "Comment", body = CommentResponse),
        (status = 404, description = "Comment not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_comment(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<CommentResponse>, ApiError> {
    let comment: Comment = state
        .store
        .get(COLLECTION, &id)
        .await
        .and_then(|document| document.into_model())
        .map_err(|err| api_store_error("Comment", &id, err))?;
    Ok(Json(CommentResponse::success(
        comment,
        "Comment retrieved successfully",
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/comments",
    tag = "comments",
    security(("bearerAuth" = [])),
    request_body = CommentCreateRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Profanity or validation failure", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_comment(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Json(body): Json<CommentCreateRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let fields = into_fields(&NewComment {
        author_id: caller.id,
        comment: body.comment,
    })
        .map_err(|err| api_internal("Failed to create comment", &err))?;
    let comment: Comment = state
        .store
        .create(COLLECTION, fields)
        .await
        .and_then(|document| document.into_model())
        .map_err(|err| api_internal("Failed to create comment", &err))?;
    tracing::info!(entity = %Entity::Comments, id = %comment.id, "comment created");
    Ok((
        StatusCode::CREATED,
        Json(CommentResponse::success(comment, "Comment created successfully")),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/comments/{id}",
    tag = "comments",
    security(("bearerAuth" = [])),
    params(("id" = String, Path, description = "Comment identifier")),
    request_body = CommentUpdateRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = 403, description = "Not an admin or the author", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Comment not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_comment(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<CommentUpdateRequest>,
) -> Result<Json<CommentResponse>, ApiError> {
    let fields =
        into_fields(&body).map_err(|err| api_internal("Failed to update comment", &err))?;
    let comment: Comment = state
        .store
        .update(COLLECTION, &id, fields)
        .await
        .and_then(|document| document.into_model())
        .map_err(|err| api_store_error("Comment", &id, err))?;
    Ok(Json(CommentResponse::success(
        comment,
        "Comment updated successfully",
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/comments/{id}",
    tag = "comments",
    security(("bearerAuth" = [])),
    params(("id" = String, Path, description = "Comment identifier")),
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 404, description = "Comment not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_comment(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .delete(COLLECTION, &id)
        .await
        .map_err(|err| api_store_error("Comment", &id, err))?;
    Ok(Json(MessageResponse::success("Comment successfully deleted")))
}
