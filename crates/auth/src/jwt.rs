//! HS512 JWT issuance and verification.
//!
//! Tokens carry a [`Claims`] payload binding an id and a subject to the
//! configured issuer. Expiry is optional: a negative TTL issues tokens with
//! no `exp` claim.

use std::collections::HashSet;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::TokenConfig;
use crate::error::AuthError;

/// Claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Token id, supplied by the caller at issue time.
    pub jti: String,
    /// Subject, supplied by the caller at issue time.
    pub sub: String,
    /// Issuer.
    pub iss: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp), absent for non-expiring tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Issues and verifies tokens under one issuer and secret.
pub struct TokenService {
    issuer: String,
    ttl_millis: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .field("ttl_millis", &self.ttl_millis)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Build the service, decoding the base64 secret once.
    pub fn new(config: &TokenConfig) -> Result<Self, AuthError> {
        let secret = config.secret.trim();
        if secret.is_empty() {
            return Err(AuthError::InvalidSecret("secret is empty".to_string()));
        }
        let encoding_key = EncodingKey::from_base64_secret(secret)
            .map_err(|e| AuthError::InvalidSecret(e.to_string()))?;
        let decoding_key = DecodingKey::from_base64_secret(secret)
            .map_err(|e| AuthError::InvalidSecret(e.to_string()))?;

        tracing::info!(issuer = %config.issuer, ttl_millis = config.ttl_millis, "Token service ready");
        Ok(Self {
            issuer: config.issuer.clone(),
            ttl_millis: config.ttl_millis,
            encoding_key,
            decoding_key,
        })
    }

    /// Issue a signed token for the given id and subject.
    pub fn issue(&self, id: &str, subject: &str) -> Result<String, AuthError> {
        tracing::info!(id, subject, "Issuing token");

        let now_millis = chrono::Utc::now().timestamp_millis();
        let exp = (self.ttl_millis >= 0).then(|| now_millis.saturating_add(self.ttl_millis) / 1000);

        let claims = Claims {
            jti: id.to_string(),
            sub: subject.to_string(),
            iss: self.issuer.clone(),
            iat: now_millis / 1000,
            exp,
        };
        self.sign(&claims)
    }

    /// Verify a token and return all of its claims.
    ///
    /// Fails with [`AuthError::ExpiredToken`] past expiry and with
    /// [`AuthError::InvalidToken`] for anything else that does not verify.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation())
            .inspect_err(|e| tracing::debug!(error = %e, "Token verification failed"))?;
        Ok(data.claims)
    }

    pub fn verify_and_get_id(&self, token: &str) -> Result<String, AuthError> {
        tracing::debug!("Reading id from token");
        self.verify(token).map(|claims| claims.jti)
    }

    pub fn verify_and_get_subject(&self, token: &str) -> Result<String, AuthError> {
        tracing::debug!("Reading subject from token");
        self.verify(token).map(|claims| claims.sub)
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS512), claims, &self.encoding_key).map_err(AuthError::Signing)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.set_issuer(&[&self.issuer]);
        // `exp` is optional; it is still checked whenever present.
        validation.required_spec_claims = HashSet::new();
        validation.leeway = 0;
        validation
    }
}
