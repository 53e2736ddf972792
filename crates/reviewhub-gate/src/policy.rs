use crate::{AuthorizationPolicy, FieldConstraintSet};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Create and update carry a body that must be inspected.
    pub fn is_write(&self) -> bool {
        matches!(self, Operation::Create | Operation::Update)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the gate needs to decide on one route.
///
/// Built once when the router is assembled and shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    pub entity: String,
    pub operation: Operation,
    pub authorization: AuthorizationPolicy,
    pub profanity_fields: Vec<String>,
    pub constraints: Option<Arc<FieldConstraintSet>>,
}

impl RoutePolicy {
    pub fn new(
        entity: impl Into<String>,
        operation: Operation,
        authorization: AuthorizationPolicy,
    ) -> Self {
        Self {
            entity: entity.into(),
            operation,
            authorization,
            profanity_fields: Vec::new(),
            constraints: None,
        }
    }

    pub fn with_profanity_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profanity_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_constraints(mut self, constraints: Option<Arc<FieldConstraintSet>>) -> Self {
        self.constraints = constraints;
        self
    }

    /// True when the request body has to be buffered and inspected.
    pub fn inspects_body(&self) -> bool {
        self.operation.is_write()
            && (!self.profanity_fields.is_empty() || self.constraints.is_some())
    }

    /// `entity.operation`, used as the route label in logs and metrics.
    pub fn label(&self) -> String {
        format!("{}.{}", self.entity, self.operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn only_writes_with_checks_inspect_the_body() {
        let authz = AuthorizationPolicy::new([Role::User]);
        let read = RoutePolicy::new("reviews", Operation::Get, authz.clone())
            .with_profanity_fields(["title"]);
        assert!(!read.inspects_body());

        let bare_write = RoutePolicy::new("reviews", Operation::Create, authz.clone());
        assert!(!bare_write.inspects_body());

        let write = RoutePolicy::new("reviews", Operation::Create, authz)
            .with_profanity_fields(["title", "content"]);
        assert!(write.inspects_body());
        assert_eq!(write.profanity_fields, vec!["title", "content"]);
        assert_eq!(write.label(), "reviews.create");
    }

    #[test]
    fn write_operations() {
        assert!(Operation::Create.is_write());
        assert!(Operation::Update.is_write());
        assert!(!Operation::Delete.is_write());
        assert!(!Operation::List.is_write());
        assert!(!Operation::Get.is_write());
    }
}
