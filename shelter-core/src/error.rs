use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};

/// Message returned to callers in place of internal error details.
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Why an authenticated caller was turned away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// A specific role was required and the caller holds another one.
    Role { required: String, actual: String },
    /// The caller's role is not in the allowed set for a permission.
    Permission {
        permission: String,
        actual: String,
        allowed: Vec<String>,
    },
}

/// Reason attached to a [`ApiError::Conflict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    ForeignKeyConstraint,
}

impl ConflictReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictReason::ForeignKeyConstraint => "FOREIGN_KEY_CONSTRAINT",
        }
    }
}

/// Every failure an operation can surface to a caller.
///
/// Each variant carries only the context relevant to it. Rendering happens in
/// one place ([`ApiError::to_graphql`] / [`IntoResponse`]) so adding a variant
/// forces every renderer to handle it.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// No caller identity where one is required, or bad credentials.
    Unauthenticated(String),
    /// Authenticated caller denied by role or ownership policy.
    Forbidden { message: String, denial: Denial },
    /// Client-supplied data is invalid or references something that does not exist.
    BadUserInput { message: String, field: String },
    /// A delete was refused because dependent records exist.
    Conflict {
        message: String,
        field: String,
        reason: ConflictReason,
    },
    /// Environment or storage failure. The message is logged, never returned.
    Internal(String),
}

impl ApiError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated(message.into())
    }

    pub fn bad_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::BadUserInput {
            message: message.into(),
            field: field.into(),
        }
    }

    pub fn foreign_key(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Conflict {
            message: message.into(),
            field: field.into(),
            reason: ConflictReason::ForeignKeyConstraint,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    /// Machine-readable code carried in `extensions.code`.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated(_) => "UNAUTHENTICATED",
            ApiError::Forbidden { .. } => "FORBIDDEN",
            ApiError::BadUserInput { .. } => "BAD_USER_INPUT",
            ApiError::Conflict { .. } => "CONFLICT",
            ApiError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::BadUserInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to callers. Internal details are replaced.
    pub fn public_message(&self) -> &str {
        match self {
            ApiError::Unauthenticated(message)
            | ApiError::Forbidden { message, .. }
            | ApiError::BadUserInput { message, .. }
            | ApiError::Conflict { message, .. } => message,
            ApiError::Internal(_) => INTERNAL_MESSAGE,
        }
    }

    /// The field name this error is tagged with, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ApiError::BadUserInput { field, .. } | ApiError::Conflict { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Diagnostic context rendered under `extensions`.
    pub fn extensions(&self) -> Map<String, Value> {
        let mut ext = Map::new();
        ext.insert("code".into(), Value::from(self.code()));
        match self {
            ApiError::Forbidden { denial, .. } => match denial {
                Denial::Role { required, actual } => {
                    ext.insert("requiredRole".into(), Value::from(required.as_str()));
                    ext.insert("userRole".into(), Value::from(actual.as_str()));
                }
                Denial::Permission {
                    permission,
                    actual,
                    allowed,
                } => {
                    ext.insert("permission".into(), Value::from(permission.as_str()));
                    ext.insert("userRole".into(), Value::from(actual.as_str()));
                    ext.insert("allowedRoles".into(), json!(allowed));
                }
            },
            ApiError::BadUserInput { field, .. } => {
                ext.insert("field".into(), Value::from(field.as_str()));
            }
            ApiError::Conflict { field, reason, .. } => {
                ext.insert("field".into(), Value::from(field.as_str()));
                ext.insert("reason".into(), Value::from(reason.as_str()));
            }
            ApiError::Unauthenticated(_) | ApiError::Internal(_) => {}
        }
        ext
    }

    /// Render as a GraphQL-style error entry, optionally tagged with a response path.
    pub fn to_graphql(&self, path: Option<&str>) -> Value {
        if let ApiError::Internal(detail) = self {
            tracing::error!(error = %detail, "internal error");
        }
        let mut entry = Map::new();
        entry.insert("message".into(), Value::from(self.public_message()));
        if let Some(path) = path {
            entry.insert("path".into(), json!([path]));
        }
        entry.insert("extensions".into(), Value::Object(self.extensions()));
        Value::Object(entry)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Unauthenticated(msg) => write!(f, "Unauthenticated: {msg}"),
            ApiError::Forbidden { message, .. } => write!(f, "Forbidden: {message}"),
            ApiError::BadUserInput { message, field } => {
                write!(f, "Bad user input ({field}): {message}")
            }
            ApiError::Conflict { message, field, .. } => {
                write!(f, "Conflict ({field}): {message}")
            }
            ApiError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "errors": [self.to_graphql(None)] });
        (self.status(), Json(body)).into_response()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}
