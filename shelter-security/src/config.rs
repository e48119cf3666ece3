use jsonwebtoken::Algorithm;
use shelter_core::{ConfigError, ConfigSection, ShelterConfig};

/// Token signing and validation settings (`shelter.security.jwt.*`).
#[derive(Clone)]
pub struct SecurityConfig {
    /// HMAC secret shared by issuance and validation. `None` disables both.
    pub secret: Option<String>,

    /// Issuer written to and expected in the "iss" claim
    pub issuer: String,

    /// Audience written to and expected in the "aud" claim
    pub audience: String,

    /// Lifetime of issued tokens in seconds (default: 7 days)
    pub token_ttl_secs: u64,

    /// Allowed JWT algorithms. Tokens using other algorithms are rejected.
    /// Default: HS256 only.
    pub allowed_algorithms: Vec<Algorithm>,
}

pub const DEFAULT_ISSUER: &str = "shelter-api";
pub const DEFAULT_AUDIENCE: &str = "shelter-app";
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

impl SecurityConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            ..Self::default()
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    pub fn with_token_ttl(mut self, ttl_secs: u64) -> Self {
        self.token_ttl_secs = ttl_secs;
        self
    }

    /// Set the allowed JWT algorithms. Empty lists will cause validation to fail.
    pub fn with_allowed_algorithms(
        mut self,
        algorithms: impl IntoIterator<Item = Algorithm>,
    ) -> Self {
        self.allowed_algorithms = algorithms.into_iter().collect();
        self
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            secret: None,
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            allowed_algorithms: vec![Algorithm::HS256],
        }
    }
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("allowed_algorithms", &self.allowed_algorithms)
            .finish()
    }
}

impl ConfigSection for SecurityConfig {
    fn prefix() -> &'static str {
        "shelter.security.jwt"
    }

    fn from_config(config: &ShelterConfig) -> Result<Self, ConfigError> {
        let key = |name: &str| format!("{}.{name}", Self::prefix());
        let secret = config
            .get_or::<Option<String>>(&key("secret"), None)?
            .filter(|s| !s.is_empty());
        Ok(Self {
            secret,
            issuer: config.get_or(&key("issuer"), DEFAULT_ISSUER.to_string())?,
            audience: config.get_or(&key("audience"), DEFAULT_AUDIENCE.to_string())?,
            token_ttl_secs: config.get_or(&key("ttl_secs"), DEFAULT_TOKEN_TTL_SECS)?,
            allowed_algorithms: vec![Algorithm::HS256],
        })
    }
}
