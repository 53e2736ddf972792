use crate::{GateError, GateResult, Identity};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// The token is expired, malformed, revoked or missing required claims.
    #[error("token rejected: {0}")]
    Rejected(String),
    /// The verifier could not reach a decision.
    #[error("verifier unavailable: {0}")]
    Backend(String),
}

/// Resolves a bearer token into an identity.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError>;
}

/// Extracts the credential from an `Authorization: Bearer <token>` header.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let token = header?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

#[derive(Clone)]
pub struct Authenticator {
    verifier: Arc<dyn IdentityVerifier>,
}

impl Authenticator {
    pub fn new(verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { verifier }
    }

    pub async fn authenticate(&self, token: Option<&str>) -> GateResult<Identity> {
        let token = match token.map(str::trim) {
            Some(token) if !token.is_empty() => token,
            _ => return Err(GateError::Unauthenticated),
        };
        match self.verifier.verify(token).await {
            Ok(identity) => Ok(identity),
            Err(VerifyError::Rejected(reason)) => {
                tracing::debug!(reason = %reason, "bearer token rejected");
                Err(GateError::Unauthenticated)
            }
            Err(VerifyError::Backend(detail)) => {
                tracing::warn!(detail = %detail, "identity verifier unavailable");
                Err(GateError::AuthBackend(detail))
            }
        }
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator").finish_non_exhaustive()
    }
}
