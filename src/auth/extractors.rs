use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use cookie::Cookie;
use tracing::warn;

use crate::auth::jwt::{Claims, JwtKeys};
use crate::error::AuthError;

/// Extracts and validates the session token, yielding its claims.
///
/// Transport is client-selected: a `client: not-header` request header means
/// the token rides in the `Authorization` header; anything else means the
/// `Authorization` cookie. Either way the value is `Bearer <token>`.
#[derive(Debug)]
pub struct AuthUser(pub Claims);

fn bearer_from_header(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn bearer_from_cookie(parts: &Parts) -> Option<String> {
    let raw = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    Cookie::split_parse(raw)
        .filter_map(Result::ok)
        .find(|c| c.name() == "Authorization")
        .map(|c| c.value().to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let wants_header = parts
            .headers
            .get("client")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == "not-header")
            .unwrap_or(false);

        let raw = if wants_header {
            bearer_from_header(parts)
        } else {
            bearer_from_cookie(parts)
        }
        .ok_or(AuthError::Unauthorized)?;

        let token = raw
            .strip_prefix("Bearer ")
            .ok_or(AuthError::Unauthorized)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "session token rejected");
            AuthError::Unauthorized
        })?;

        Ok(AuthUser(claims))
    }
}
