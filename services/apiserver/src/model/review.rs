use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    #[serde(default)]
    pub author_id: String,
    pub title: String,
    pub content: String,
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewCreateRequest {
    pub title: String,
    pub content: String,
    pub rating: f64,
}

/// Fields left out keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ReviewUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

/// Stored form of a review before the store assigns an id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub author_id: String,
    pub title: String,
    pub content: String,
    pub rating: f64,
}

impl NewReview {
    pub fn new(author_id: impl Into<String>, request: ReviewCreateRequest) -> Self {
        Self {
            author_id: author_id.into(),
            title: request.title,
            content: request.content,
            rating: request.rating,
        }
    }
}
