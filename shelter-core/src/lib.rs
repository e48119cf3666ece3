pub mod config;
pub mod error;
pub mod layers;

pub use config::{
    ConfigError, ConfigSection, ConfigValue, DefaultSecretResolver, FromConfigValue,
    SecretResolver, ShelterConfig,
};
pub use error::{ApiError, ConflictReason, Denial};
pub use layers::{catch_panic_layer, default_cors, default_trace, init_tracing};

/// Result alias used across the workspace.
pub type ApiResult<T> = Result<T, ApiError>;
