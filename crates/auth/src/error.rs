/// Errors raised while configuring, issuing, or verifying tokens.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Bad signature, wrong issuer, or a malformed token.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has expired")]
    ExpiredToken,

    /// The signing secret is empty or not valid base64.
    #[error("Invalid signing secret: {0}")]
    InvalidSecret(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    /// Classify a verification failure.
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken(err.to_string()),
        }
    }
}
