//! Lexicon administration.
//!
//! # Purpose
//! Lets admins ban additional words at runtime. Words only ever get added;
//! requests admitted after this call returns see the new words.
use crate::api::error::{ApiError, api_validation_error};
use crate::api::types::{LexiconUpdate, LexiconUpdateRequest, LexiconUpdateResponse};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

#[utoipa::path(
    post,
    path = "/api/v1/admin/lexicon",
    tag = "admin",
    security(("bearerAuth" = [])),
    request_body = LexiconUpdateRequest,
    responses(
        (status = 200, description = "Words added to the lexicon", body = LexiconUpdateResponse),
        (status = 400, description = "Empty word list or invalid JSON", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn add_words(
    State(state): State<AppState>,
    payload: Result<Json<LexiconUpdateRequest>, JsonRejection>,
) -> Result<Json<LexiconUpdateResponse>, ApiError> {
    let Json(body) = payload?;
    if body.words.iter().all(|word| word.trim().is_empty()) {
        return Err(api_validation_error(
            "Validation error: Body: Words cannot be empty",
        ));
    }
    let added = state.lexicon.add_all(&body.words);
    let total = state.lexicon.len();
    tracing::info!(added, total, "lexicon updated");
    Ok(Json(LexiconUpdateResponse::success(
        LexiconUpdate { added, total },
        "Lexicon updated successfully",
    )))
}
