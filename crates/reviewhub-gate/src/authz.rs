use crate::{GateError, GateResult, Identity, Role};
use std::collections::HashSet;

/// Which callers may use a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationPolicy {
    pub allowed_roles: HashSet<Role>,
    pub allow_same_user: bool,
}

impl AuthorizationPolicy {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed_roles: roles.into_iter().collect(),
            allow_same_user: false,
        }
    }

    /// Lets the owner of the target resource through regardless of role.
    pub fn with_same_user(mut self) -> Self {
        self.allow_same_user = true;
        self
    }

    pub fn allows_role(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }
}

/// Decides whether `identity` may proceed. Performs no lookups; the caller
/// supplies the resource owner when one exists.
pub fn authorize(
    identity: &Identity,
    policy: &AuthorizationPolicy,
    resource_owner_id: Option<&str>,
) -> GateResult<()> {
    if policy.allows_role(identity.role) {
        return Ok(());
    }
    if policy.allow_same_user && resource_owner_id == Some(identity.id.as_str()) {
        return Ok(());
    }
    Err(GateError::Forbidden)
}
