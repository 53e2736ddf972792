use crate::schema::Violation;
use thiserror::Error;

/// Terminal outcome of a denied request.
///
/// Display strings are the client-facing messages; the HTTP layer maps each
/// variant to a status code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Unauthorized")]
    Unauthenticated,
    #[error("Forbidden")]
    Forbidden,
    #[error("Profanity is NOT ALLOWED in {0}")]
    ProfanityDetected(String),
    #[error("{0}")]
    ValidationFailed(Violation),
    #[error("identity backend failure: {0}")]
    AuthBackend(String),
}

impl GateError {
    /// Everything except an identity backend failure is caused by the client.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, GateError::AuthBackend(_))
    }

    /// Stable label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GateError::Unauthenticated => "unauthenticated",
            GateError::Forbidden => "forbidden",
            GateError::ProfanityDetected(_) => "profanity",
            GateError::ValidationFailed(_) => "validation",
            GateError::AuthBackend(_) => "auth_backend",
        }
    }
}

pub type GateResult<T> = Result<T, GateError>;
