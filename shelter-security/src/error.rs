use shelter_core::{ApiError, Denial};

use crate::permission::Permission;
use crate::role::Role;

/// Outcome of a failed authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No caller where one is required.
    Unauthenticated,
    /// A specific role was required.
    RoleRequired { required: Role, actual: Role },
    /// The caller's role is not granted the permission.
    PermissionDenied { permission: Permission, actual: Role },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Unauthenticated => write!(f, "Authentication required"),
            AuthError::RoleRequired { required, .. } => write!(f, "{required} role required"),
            AuthError::PermissionDenied { permission, .. } => {
                write!(f, "Insufficient permissions for {permission}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::Unauthenticated => ApiError::Unauthenticated(message),
            AuthError::RoleRequired { required, actual } => ApiError::Forbidden {
                message,
                denial: Denial::Role {
                    required: required.to_string(),
                    actual: actual.to_string(),
                },
            },
            AuthError::PermissionDenied { permission, actual } => ApiError::Forbidden {
                message,
                denial: Denial::Permission {
                    permission: permission.to_string(),
                    actual: actual.to_string(),
                    allowed: permission
                        .allowed_roles()
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                },
            },
        }
    }
}

/// Errors from bearer parsing, token handling and password hashing.
#[derive(Debug)]
pub enum SecurityError {
    /// The authorization scheme is not "Bearer".
    InvalidAuthScheme,

    /// The JWT token is invalid (malformed, bad signature, etc.).
    InvalidToken(String),

    /// The JWT token has expired.
    TokenExpired,

    /// Token validation failed (issuer, audience, algorithm or claim mismatch).
    ValidationFailed(String),

    /// No signing secret is configured.
    SigningKeyMissing,

    /// Signing a token or hashing a password failed.
    Crypto(String),
}

impl std::fmt::Display for SecurityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecurityError::InvalidAuthScheme => write!(f, "Invalid authorization scheme"),
            SecurityError::InvalidToken(msg) => write!(f, "Invalid token: {msg}"),
            SecurityError::TokenExpired => write!(f, "Token expired"),
            SecurityError::ValidationFailed(msg) => write!(f, "Token validation failed: {msg}"),
            SecurityError::SigningKeyMissing => write!(f, "JWT secret not configured"),
            SecurityError::Crypto(msg) => write!(f, "Crypto failure: {msg}"),
        }
    }
}

impl std::error::Error for SecurityError {}

impl SecurityError {
    /// Whether the failure is the caller's fault rather than the server's.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            SecurityError::SigningKeyMissing | SecurityError::Crypto(_)
        )
    }
}

impl From<SecurityError> for ApiError {
    fn from(err: SecurityError) -> Self {
        if err.is_client_error() {
            ApiError::Unauthenticated("Invalid or expired token".to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}
