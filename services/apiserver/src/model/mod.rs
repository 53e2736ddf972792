//! Entity models exposed by the HTTP API.
//!
//! # Purpose
//! Typed views over stored documents plus the request payloads that create
//! and update them. Wire names are camelCase.
mod category;
mod comment;
mod review;

pub use category::{Category, CategoryCreateRequest, CategoryUpdateRequest};
pub use comment::{Comment, CommentCreateRequest, CommentUpdateRequest, NewComment};
pub use review::{NewReview, Review, ReviewCreateRequest, ReviewUpdateRequest};

/// Route families served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Reviews,
    Comments,
    Categories,
    Lexicon,
}

impl Entity {
    /// Collection name in the document store; also the route label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Reviews => "reviews",
            Entity::Comments => "comments",
            Entity::Categories => "categories",
            Entity::Lexicon => "lexicon",
        }
    }

    /// Entities whose documents record an `authorId`.
    pub fn is_owned(&self) -> bool {
        matches!(self, Entity::Reviews | Entity::Comments)
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
