use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use shelter_core::ApiError;
use shelter_security::{bearer_from_headers, Caller, JwtValidator};
use tracing::{debug, warn};

/// The caller behind a request.
///
/// No `Authorization` header means an anonymous caller. A header that is
/// present but not a valid bearer token rejects the whole request with 401.
#[derive(Debug, Clone)]
pub struct CurrentCaller(pub Option<Caller>);

impl<S> FromRequestParts<S> for CurrentCaller
where
    S: Send + Sync,
    Arc<JwtValidator>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_from_headers(&parts.headers)? else {
            return Ok(CurrentCaller(None));
        };

        let validator = Arc::<JwtValidator>::from_ref(state);
        let caller = validator.caller(token).map_err(|err| {
            warn!(uri = %parts.uri, error = %err, "bearer token rejected");
            ApiError::from(err)
        })?;
        debug!(caller = %caller.id, role = %caller.role, "caller authenticated");
        Ok(CurrentCaller(Some(caller)))
    }
}
