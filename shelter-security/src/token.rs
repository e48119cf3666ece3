use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::caller::Caller;
use crate::config::SecurityConfig;
use crate::error::SecurityError;
use crate::jwt::TokenClaims;

/// A signed token and its expiry (seconds since the epoch).
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: u64,
}

/// Signs HS256 tokens for authenticated users.
pub struct TokenService {
    key: Option<EncodingKey>,
    config: SecurityConfig,
}

impl TokenService {
    pub fn new(config: SecurityConfig) -> Self {
        let key = config
            .secret
            .as_deref()
            .map(|secret| EncodingKey::from_secret(secret.as_bytes()));
        Self { key, config }
    }

    /// Issue a JWT for the given caller.
    ///
    /// Fails with [`SecurityError::SigningKeyMissing`] when no secret is configured.
    pub fn issue(&self, caller: &Caller) -> Result<IssuedToken, SecurityError> {
        let key = self.key.as_ref().ok_or(SecurityError::SigningKeyMissing)?;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| SecurityError::Crypto(format!("system clock error: {e}")))?
            .as_secs();
        let exp = now + self.config.token_ttl_secs;

        let claims = TokenClaims {
            sub: caller.id.clone(),
            email: caller.email.clone(),
            role: caller.role,
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            iat: now,
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, key)
            .map_err(|e| SecurityError::Crypto(format!("failed to sign JWT: {e}")))?;
        tracing::debug!(sub = %caller.id, exp, "token issued");
        Ok(IssuedToken {
            token,
            expires_at: exp,
        })
    }
}
