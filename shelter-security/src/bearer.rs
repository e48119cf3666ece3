use http::header::AUTHORIZATION;
use http::HeaderMap;

use crate::error::SecurityError;

/// Extract the token from an `Authorization` header value.
pub fn bearer_token(header_value: &str) -> Result<&str, SecurityError> {
    let (scheme, token) = header_value
        .split_once(' ')
        .ok_or(SecurityError::InvalidAuthScheme)?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(SecurityError::InvalidAuthScheme);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(SecurityError::InvalidToken("empty bearer token".into()));
    }
    Ok(token)
}

/// Extract the bearer token from request headers.
///
/// `Ok(None)` when no `Authorization` header is present.
pub fn bearer_from_headers(headers: &HeaderMap) -> Result<Option<&str>, SecurityError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| SecurityError::InvalidAuthScheme)?;
    bearer_token(value).map(Some)
}
