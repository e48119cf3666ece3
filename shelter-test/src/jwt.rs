use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use shelter_security::config::{DEFAULT_AUDIENCE, DEFAULT_ISSUER};
use shelter_security::{Caller, Role, SecurityConfig, TokenClaims};

const TEST_SECRET: &str = "shelter-test-secret";

/// Mints HS256 tokens the server under test will accept.
///
/// ```ignore
/// let jwt = TestJwt::new();
/// let state = AppState::new(store, jwt.security_config(), LoaderConfig::default());
/// app.graphql(ops).bearer(&jwt.token(Role::Staff)).send().await;
/// ```
#[derive(Debug, Clone)]
pub struct TestJwt {
    secret: String,
    issuer: String,
    audience: String,
}

impl Default for TestJwt {
    fn default() -> Self {
        Self::new()
    }
}

impl TestJwt {
    pub fn new() -> Self {
        Self {
            secret: TEST_SECRET.to_string(),
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    /// Validation settings matching the tokens this instance mints.
    pub fn security_config(&self) -> SecurityConfig {
        SecurityConfig::new(self.secret.clone())
            .with_issuer(self.issuer.clone())
            .with_audience(self.audience.clone())
    }

    /// A token for a synthetic caller holding `role`.
    pub fn token(&self, role: Role) -> String {
        let name = role.as_str().to_lowercase();
        self.token_for(&Caller::new(
            format!("test-{name}"),
            format!("{name}@test.local"),
            role,
        ))
    }

    pub fn token_for(&self, caller: &Caller) -> String {
        self.sign(caller, now() + 3600)
    }

    /// A correctly signed token that expired an hour ago.
    pub fn expired_token(&self, caller: &Caller) -> String {
        self.sign(caller, now() - 3600)
    }

    fn sign(&self, caller: &Caller, exp: u64) -> String {
        let claims = TokenClaims {
            sub: caller.id.clone(),
            email: caller.email.clone(),
            role: caller.role,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now().min(exp),
            exp,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .expect("failed to sign test token")
    }
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_secs()
}
