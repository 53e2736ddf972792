//! Remote token introspection.
//!
//! # Purpose
//! Verifies opaque bearer tokens by POSTing them to an identity service and
//! reading back `{ active, sub, role }`.
//!
//! # Key invariants
//! - 401/403 responses and `active: false` reject the token.
//! - Transport errors, timeouts, other statuses and undecodable bodies are
//!   backend failures, never rejections.
use async_trait::async_trait;
use reviewhub_gate::{Identity, IdentityVerifier, Role, VerifyError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct IntrospectionRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct IntrospectionResponse {
    active: bool,
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

pub struct IntrospectionVerifier {
    client: reqwest::Client,
    url: String,
}

impl IntrospectionVerifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, url))
    }

    /// Uses a caller-configured client; its timeout bounds every verification.
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for IntrospectionVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&IntrospectionRequest { token })
            .send()
            .await
            .map_err(|err| VerifyError::Backend(err.to_string()))?;
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(VerifyError::Rejected(format!("introspection returned {status}")));
        }
        if !status.is_success() {
            return Err(VerifyError::Backend(format!("introspection returned {status}")));
        }
        let body: IntrospectionResponse = response
            .json()
            .await
            .map_err(|err| VerifyError::Backend(err.to_string()))?;
        if !body.active {
            return Err(VerifyError::Rejected("inactive token".to_string()));
        }
        let subject = body
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or_else(|| VerifyError::Rejected("missing subject".to_string()))?;
        let role = body
            .role
            .ok_or_else(|| VerifyError::Rejected("missing role claim".to_string()))?
            .parse::<Role>()
            .map_err(|err| VerifyError::Rejected(err.to_string()))?;
        Ok(Identity::new(subject, role))
    }
}
