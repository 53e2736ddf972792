use crate::{Identity, IdentityVerifier, Role, VerifyError};
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub exp: i64,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// HS256 verifier for tokens issued with a shared secret.
pub struct JwtVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: Option<String>,
    audience: Option<String>,
    leeway: u64,
}

impl JwtVerifier {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: None,
            audience: None,
            leeway: 0,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_leeway(mut self, leeway: u64) -> Self {
        self.leeway = leeway;
        self
    }

    /// Issues a token for `subject` that this verifier will accept until `ttl`
    /// elapses.
    pub fn mint(
        &self,
        subject: &str,
        role: Role,
        ttl: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = now_epoch_seconds();
        let claims = IdentityClaims {
            sub: subject.to_string(),
            role: Some(role),
            exp: now + ttl.as_secs() as i64,
            iat: now,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    pub fn decode(&self, token: &str) -> Result<IdentityClaims, VerifyError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway;
        match &self.issuer {
            Some(issuer) => validation.set_issuer(&[issuer.as_str()]),
            None => validation.iss = None,
        }
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience.as_str()]),
            None => validation.validate_aud = false,
        }
        jsonwebtoken::decode::<IdentityClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|err| VerifyError::Rejected(err.to_string()))
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        let claims = self.decode(token)?;
        let role = claims
            .role
            .ok_or_else(|| VerifyError::Rejected("missing role claim".to_string()))?;
        if claims.sub.is_empty() {
            return Err(VerifyError::Rejected("missing subject".to_string()));
        }
        Ok(Identity::new(claims.sub, role))
    }
}

fn now_epoch_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"reviewhub-test-secret";

    fn encode(claims: &serde_json::Value, secret: &[u8]) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .expect("encode token")
    }

    #[tokio::test]
    async fn mint_and_verify_roundtrip() {
        let verifier = JwtVerifier::new(SECRET)
            .with_issuer("reviewhub-auth")
            .with_audience("reviewhub-api");
        let token = verifier
            .mint("42", Role::Admin, Duration::from_secs(600))
            .expect("mint");
        let identity = verifier.verify(&token).await.expect("verify");
        assert_eq!(identity, Identity::new("42", Role::Admin));
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected() {
        let token = JwtVerifier::new(b"other")
            .mint("42", Role::User, Duration::from_secs(600))
            .expect("mint");
        let err = JwtVerifier::new(SECRET).verify(&token).await.expect_err("reject");
        assert!(matches!(err, VerifyError::Rejected(_)));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let now = now_epoch_seconds();
        let token = encode(
            &serde_json::json!({"sub": "1", "role": "user", "exp": now - 3600, "iat": now - 7200}),
            SECRET,
        );
        let err = JwtVerifier::new(SECRET).verify(&token).await.expect_err("expired");
        assert!(matches!(err, VerifyError::Rejected(_)));
    }

    #[tokio::test]
    async fn leeway_accepts_recently_expired_token() {
        let now = now_epoch_seconds();
        let token = encode(
            &serde_json::json!({"sub": "1", "role": "user", "exp": now - 30, "iat": now - 600}),
            SECRET,
        );
        let err = JwtVerifier::new(SECRET).verify(&token).await.expect_err("no leeway");
        assert!(matches!(err, VerifyError::Rejected(_)));

        let identity = JwtVerifier::new(SECRET)
            .with_leeway(120)
            .verify(&token)
            .await
            .expect("within leeway");
        assert_eq!(identity, Identity::new("1", Role::User));
    }

    #[tokio::test]
    async fn missing_role_claim_is_rejected() {
        let now = now_epoch_seconds();
        let token = encode(
            &serde_json::json!({"sub": "1", "exp": now + 600, "iat": now}),
            SECRET,
        );
        let err = JwtVerifier::new(SECRET).verify(&token).await.expect_err("no role");
        assert_eq!(err, VerifyError::Rejected("missing role claim".to_string()));
    }

    #[tokio::test]
    async fn unknown_role_is_rejected() {
        let now = now_epoch_seconds();
        let token = encode(
            &serde_json::json!({"sub": "1", "role": "root", "exp": now + 600, "iat": now}),
            SECRET,
        );
        assert!(JwtVerifier::new(SECRET).verify(&token).await.is_err());
    }

    #[tokio::test]
    async fn issuer_mismatch_is_rejected() {
        let token = JwtVerifier::new(SECRET)
            .with_issuer("someone-else")
            .mint("1", Role::User, Duration::from_secs(600))
            .expect("mint");
        let verifier = JwtVerifier::new(SECRET).with_issuer("reviewhub-auth");
        assert!(matches!(
            verifier.verify(&token).await,
            Err(VerifyError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn audience_is_ignored_when_not_configured() {
        let token = JwtVerifier::new(SECRET)
            .with_audience("any-api")
            .mint("7", Role::User, Duration::from_secs(600))
            .expect("mint");
        let identity = JwtVerifier::new(SECRET).verify(&token).await.expect("verify");
        assert_eq!(identity.id, "7");
    }

    #[tokio::test]
    async fn garbage_is_rejected() {
        let err = JwtVerifier::new(SECRET)
            .verify("not-a-jwt")
            .await
            .expect_err("garbage");
        assert!(matches!(err, VerifyError::Rejected(_)));
    }
}
