use crate::{
    Authenticator, Candidate, GateError, GateResult, Identity, Lexicon, RoutePolicy, Violation,
    authorize, check_fields, validate_in_place,
};
use std::future::Future;
use std::sync::Arc;

/// Runs the fixed stage pipeline for one route.
///
/// Identity checks happen in [`RequestGate::admit`]; body checks happen in
/// [`RequestGate::inspect`]. Transports that must do work between the two
/// (buffering a body, for example) call them separately; others use
/// [`RequestGate::evaluate`].
#[derive(Debug, Clone)]
pub struct RequestGate {
    authenticator: Authenticator,
    lexicon: Arc<Lexicon>,
}

impl RequestGate {
    pub fn new(authenticator: Authenticator, lexicon: Arc<Lexicon>) -> Self {
        Self {
            authenticator,
            lexicon,
        }
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    /// Authenticates, then authorizes.
    ///
    /// `resolve_owner` runs at most once and only when the caller's role is
    /// not enough on its own and the route grants the same-user exemption.
    pub async fn admit<F, Fut>(
        &self,
        policy: &RoutePolicy,
        token: Option<&str>,
        resolve_owner: F,
    ) -> GateResult<Identity>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<String>>,
    {
        let identity = self.authenticator.authenticate(token).await?;
        let authorization = &policy.authorization;
        let owner = if !authorization.allows_role(identity.role) && authorization.allow_same_user
        {
            resolve_owner().await
        } else {
            None
        };
        authorize(&identity, authorization, owner.as_deref())?;
        tracing::debug!(
            route = %policy.label(),
            user = %identity.id,
            role = %identity.role,
            "request admitted"
        );
        Ok(identity)
    }

    /// Profanity check, then schema validation. No-op for reads.
    pub fn inspect(&self, policy: &RoutePolicy, candidate: &mut Candidate) -> GateResult<()> {
        if !policy.inspects_body() {
            return Ok(());
        }
        if !candidate.body.is_object() {
            return Err(GateError::ValidationFailed(Violation::body_not_object()));
        }
        check_fields(&self.lexicon, &candidate.body, &policy.profanity_fields)?;
        if let Some(constraints) = &policy.constraints {
            validate_in_place(constraints, candidate).map_err(GateError::ValidationFailed)?;
        }
        Ok(())
    }

    pub async fn evaluate<F, Fut>(
        &self,
        policy: &RoutePolicy,
        token: Option<&str>,
        resolve_owner: F,
        candidate: &mut Candidate,
    ) -> GateResult<Identity>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<String>>,
    {
        let identity = self.admit(policy, token, resolve_owner).await?;
        self.inspect(policy, candidate)?;
        Ok(identity)
    }
}
