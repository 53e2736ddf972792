//! OpenAPI schema aggregation for the reviewhub API.
//!
//! # Purpose
//! Collects all routes and schema types into a single OpenAPI document for docs
//! and client generation, and declares the `bearerAuth` scheme gated routes use.
use crate::api::types::{
    CategoryListResponse, CategoryResponse, CommentListResponse, CommentResponse, ErrorResponse,
    HealthResponse, LexiconUpdate, LexiconUpdateRequest, LexiconUpdateResponse, MessageResponse,
    ReviewListResponse, ReviewResponse,
};
use crate::api::{categories, comments, lexicon, reviews, system};
use crate::model::{
    Category, CategoryCreateRequest, CategoryUpdateRequest, Comment, CommentCreateRequest,
    CommentUpdateRequest, Review, ReviewCreateRequest, ReviewUpdateRequest,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "reviewhub-apiserver",
        description = "Reviews, comments and categories behind the request gate"
    ),
    modifiers(&BearerAuth),
    paths(
        system::root,
        system::health,
        reviews::list_reviews,
        reviews::get_review,
        reviews::create_review,
        reviews::update_review,
        reviews::delete_review,
        comments::list_comments,
        comments::get_comment,
        comments::create_comment,
        comments::update_comment,
        comments::delete_comment,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        lexicon::add_words
    ),
    components(schemas(
        ErrorResponse,
        MessageResponse,
        HealthResponse,
        Review,
        ReviewCreateRequest,
        ReviewUpdateRequest,
        ReviewResponse,
        ReviewListResponse,
        Comment,
        CommentCreateRequest,
        CommentUpdateRequest,
        CommentResponse,
        CommentListResponse,
        Category,
        CategoryCreateRequest,
        CategoryUpdateRequest,
        CategoryResponse,
        CategoryListResponse,
        LexiconUpdate,
        LexiconUpdateRequest,
        LexiconUpdateResponse
    )),
    tags(
        (name = "system", description = "Greeting and health"),
        (name = "reviews", description = "Review management"),
        (name = "comments", description = "Comment management"),
        (name = "categories", description = "Category management"),
        (name = "admin", description = "Lexicon administration")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
