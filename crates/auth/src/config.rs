use crate::error::AuthError;

/// Default token lifetime in milliseconds (one hour).
const DEFAULT_TTL_MILLIS: i64 = 3_600_000;

/// Configuration for token issuance and verification.
#[derive(Clone)]
pub struct TokenConfig {
    /// Base64-encoded HMAC-SHA512 secret.
    pub secret: String,
    /// Value of the `iss` claim; tokens from other issuers are rejected.
    pub issuer: String,
    /// Token lifetime in milliseconds. Negative means tokens never expire.
    pub ttl_millis: i64,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("ttl_millis", &self.ttl_millis)
            .finish()
    }
}

impl TokenConfig {
    /// Load token configuration from environment variables, after reading a
    /// `.env` file if one exists. Variables already set take precedence.
    ///
    /// | Env Var          | Required | Default   |
    /// |------------------|----------|-----------|
    /// | `JWT_SECRET`     | **yes**  | --        |
    /// | `JWT_ISSUER`     | **yes**  | --        |
    /// | `JWT_TTL_MILLIS` | no       | `3600000` |
    pub fn from_env() -> Result<Self, AuthError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AuthError::Config(format!("{key} must be set")))
        };

        let secret = required("JWT_SECRET")?;
        let issuer = required("JWT_ISSUER")?;

        let ttl_millis = match lookup("JWT_TTL_MILLIS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                AuthError::Config(format!("JWT_TTL_MILLIS must be a valid i64, got '{raw}'"))
            })?,
            None => DEFAULT_TTL_MILLIS,
        };

        Ok(Self {
            secret,
            issuer,
            ttl_millis,
        })
    }

    pub fn expires(&self) -> bool {
        self.ttl_millis >= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_loads_all_values() {
        let config = TokenConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "c2VjcmV0"),
            ("JWT_ISSUER", "quiz"),
            ("JWT_TTL_MILLIS", "-1"),
        ]))
        .expect("config should load");
        assert_eq!(config.secret, "c2VjcmV0");
        assert_eq!(config.issuer, "quiz");
        assert_eq!(config.ttl_millis, -1);
        assert!(!config.expires());
    }

    #[test]
    fn test_ttl_defaults_to_one_hour() {
        let config =
            TokenConfig::from_lookup(lookup(&[("JWT_SECRET", "c2VjcmV0"), ("JWT_ISSUER", "quiz")]))
                .unwrap();
        assert_eq!(config.ttl_millis, DEFAULT_TTL_MILLIS);
        assert!(config.expires());
    }

    #[test]
    fn test_missing_secret_fails() {
        let result = TokenConfig::from_lookup(lookup(&[("JWT_ISSUER", "quiz")]));
        assert_matches!(result, Err(AuthError::Config(msg)) if msg.contains("JWT_SECRET"));
    }

    #[test]
    fn test_blank_issuer_fails() {
        let result =
            TokenConfig::from_lookup(lookup(&[("JWT_SECRET", "c2VjcmV0"), ("JWT_ISSUER", "  ")]));
        assert_matches!(result, Err(AuthError::Config(msg)) if msg.contains("JWT_ISSUER"));
    }

    #[test]
    fn test_bad_ttl_fails() {
        let result = TokenConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "c2VjcmV0"),
            ("JWT_ISSUER", "quiz"),
            ("JWT_TTL_MILLIS", "soon"),
        ]));
        assert_matches!(result, Err(AuthError::Config(_)));
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = TokenConfig {
            secret: "c2VjcmV0".to_string(),
            issuer: "quiz".to_string(),
            ttl_millis: 0,
        };
        assert!(!format!("{config:?}").contains("c2VjcmV0"));
    }
}
