use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::caller::Caller;
use crate::config::SecurityConfig;
use crate::error::SecurityError;
use crate::role::Role;

/// Claims carried by tokens issued by [`crate::TokenService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iss: String,
    pub aud: String,
    pub iat: u64,
    pub exp: u64,
}

impl TokenClaims {
    pub fn into_caller(self) -> Caller {
        Caller {
            id: self.sub,
            email: self.email,
            role: self.role,
        }
    }
}

/// Validates HMAC-signed bearer tokens and turns them into a [`Caller`].
pub struct JwtValidator {
    key: Option<DecodingKey>,
    config: SecurityConfig,
}

impl JwtValidator {
    pub fn new(config: SecurityConfig) -> Self {
        let key = config
            .secret
            .as_deref()
            .map(|secret| DecodingKey::from_secret(secret.as_bytes()));
        Self { key, config }
    }

    /// Validate a JWT and return its claims.
    ///
    /// Checks the algorithm allow-list, signature, issuer, audience and expiry.
    pub fn validate(&self, token: &str) -> Result<TokenClaims, SecurityError> {
        let key = self.key.as_ref().ok_or(SecurityError::SigningKeyMissing)?;

        let header = decode_header(token)
            .map_err(|e| SecurityError::InvalidToken(format!("Failed to decode header: {e}")))?;
        let algorithm = header.alg;

        if !self.config.allowed_algorithms.contains(&algorithm) {
            return Err(SecurityError::ValidationFailed(format!(
                "Disallowed JWT algorithm: {algorithm:?}"
            )));
        }

        let mut validation = Validation::new(algorithm);
        validation.algorithms = self.config.allowed_algorithms.clone();
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.validate_exp = true;

        let token_data = decode::<TokenClaims>(token, key, &validation).map_err(|e| {
            let err = match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SecurityError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                    SecurityError::ValidationFailed("Invalid issuer".into())
                }
                jsonwebtoken::errors::ErrorKind::InvalidAudience => {
                    SecurityError::ValidationFailed("Invalid audience".into())
                }
                _ => SecurityError::InvalidToken(e.to_string()),
            };
            warn!(error = %err, "JWT validation failed");
            err
        })?;

        debug!(sub = %token_data.claims.sub, role = %token_data.claims.role, "JWT validated");
        Ok(token_data.claims)
    }

    /// Validate a JWT and build the caller it identifies.
    pub fn caller(&self, token: &str) -> Result<Caller, SecurityError> {
        self.validate(token).map(TokenClaims::into_caller)
    }
}
