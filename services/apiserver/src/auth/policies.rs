//! Route policy table.
//!
//! Reads are open to every authenticated role. Entity writes need an admin or
//! the resource owner, except that any user may create reviews and comments.
//! The lexicon endpoint is admin-only.
use crate::model::Entity;
use reviewhub_gate::{AuthorizationPolicy, Operation, Role, RoutePolicy, SchemaRegistry};
use std::sync::Arc;

fn profanity_fields(entity: Entity) -> &'static [&'static str] {
    match entity {
        Entity::Reviews => &["title", "content"],
        Entity::Comments => &["comment"],
        Entity::Categories => &["name"],
        Entity::Lexicon => &[],
    }
}

fn authorization(entity: Entity, operation: Operation) -> AuthorizationPolicy {
    match (entity, operation) {
        (Entity::Lexicon, _) => AuthorizationPolicy::new([Role::Admin]),
        (_, Operation::List | Operation::Get) => {
            AuthorizationPolicy::new([Role::User, Role::Admin]).with_same_user()
        }
        (Entity::Reviews | Entity::Comments, Operation::Create) => {
            AuthorizationPolicy::new([Role::User, Role::Admin]).with_same_user()
        }
        _ => AuthorizationPolicy::new([Role::Admin]).with_same_user(),
    }
}

pub fn route_policy(
    entity: Entity,
    operation: Operation,
    schemas: &SchemaRegistry,
) -> Arc<RoutePolicy> {
    let mut policy = RoutePolicy::new(entity.as_str(), operation, authorization(entity, operation));
    if operation.is_write() {
        policy = policy
            .with_profanity_fields(profanity_fields(entity).iter().copied())
            .with_constraints(schemas.get(entity.as_str(), operation));
    }
    Arc::new(policy)
}
