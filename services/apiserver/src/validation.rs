//! Built-in constraint sets for entity writes.
//!
//! One set per (entity, create|update). Messages are the client-facing texts
//! returned inside `Validation error: <Location>: <message>`.
use crate::model::Entity;
use reviewhub_gate::{
    FieldConstraint, FieldConstraintSet, Location, Operation, SchemaRegistry, ViolationKind,
};

fn required_text(required: &str, empty: &str) -> FieldConstraint {
    FieldConstraint::string()
        .required()
        .message(ViolationKind::Required, required)
        .message(ViolationKind::Empty, empty)
}

fn optional_text(empty: &str) -> FieldConstraint {
    FieldConstraint::string().message(ViolationKind::Empty, empty)
}

fn rating() -> FieldConstraint {
    FieldConstraint::number()
        .min(0.0)
        .message(ViolationKind::Min, "Rating must greater than 0")
}

pub fn review_create() -> FieldConstraintSet {
    FieldConstraintSet::new()
        .field(
            Location::Body,
            "title",
            required_text("Title is required", "Title cannot be empty"),
        )
        .field(
            Location::Body,
            "content",
            required_text("Content is required", "Content cannot be empty"),
        )
        .field(Location::Body, "rating", rating().required())
}

pub fn review_update() -> FieldConstraintSet {
    FieldConstraintSet::new()
        .field(
            Location::Params,
            "id",
            required_text("Review ID is required", "Review ID cannot be empty"),
        )
        .field(Location::Body, "title", optional_text("Title cannot be empty"))
        .field(
            Location::Body,
            "content",
            optional_text("Content cannot be empty"),
        )
        .field(Location::Body, "rating", rating())
}

pub fn comment_create() -> FieldConstraintSet {
    FieldConstraintSet::new().field(
        Location::Body,
        "comment",
        required_text("Content is required", "Content cannot be empty"),
    )
}

pub fn comment_update() -> FieldConstraintSet {
    FieldConstraintSet::new()
        .field(
            Location::Params,
            "id",
            required_text("Comment ID is required", "Comment ID cannot be empty"),
        )
        .field(
            Location::Body,
            "comment",
            optional_text("Comment cannot be empty"),
        )
}

pub fn category_create() -> FieldConstraintSet {
    FieldConstraintSet::new().field(
        Location::Body,
        "name",
        required_text("Name is required", "Category cannot be empty"),
    )
}

pub fn category_update() -> FieldConstraintSet {
    FieldConstraintSet::new()
        .field(
            Location::Params,
            "id",
            required_text("Category ID is required", "Category ID cannot be empty"),
        )
        .field(
            Location::Body,
            "name",
            optional_text("Category cannot be empty"),
        )
}

pub fn builtin_schemas() -> SchemaRegistry {
    SchemaRegistry::new()
        .with(Entity::Reviews.as_str(), Operation::Create, review_create())
        .with(Entity::Reviews.as_str(), Operation::Update, review_update())
        .with(Entity::Comments.as_str(), Operation::Create, comment_create())
        .with(Entity::Comments.as_str(), Operation::Update, comment_update())
        .with(Entity::Categories.as_str(), Operation::Create, category_create())
        .with(Entity::Categories.as_str(), Operation::Update, category_update())
}
