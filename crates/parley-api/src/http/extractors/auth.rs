//! Session token authentication extractor.
//!
//! Reads the token from:
//! - `Authorization: Bearer <token>` header
//! - the `jwt` cookie set at login
//!
//! and verifies it through the auth service, which also consults the
//! revoked-token set.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use cookie::Cookie;
use parley_types::auth::SESSION_COOKIE_NAME;
use parley_types::error::AuthError;

use crate::http::error::AppError;
use crate::state::AppState;

/// A request carrying a valid, unrevoked session token.
#[derive(Debug)]
pub struct AuthenticatedUser {
    pub user_id: i32,
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers)?;
        let claims = state.auth_service.verify_token(&token)?;
        let user_id = claims.user_id().ok_or_else(|| {
            AppError::Auth(AuthError::TokenInvalid("subject is not a user id".to_string()))
        })?;
        Ok(Self { user_id })
    }
}

/// Pull the raw session token from the request headers.
///
/// The bearer header wins over the cookie when both are present.
pub fn session_token(headers: &HeaderMap) -> Result<String, AppError> {
    if let Some(auth) = headers.get(AUTHORIZATION) {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }
    }

    for value in headers.get_all(COOKIE) {
        let Ok(raw) = value.to_str() else {
            continue;
        };
        for cookie in Cookie::split_parse(raw).flatten() {
            if cookie.name() == SESSION_COOKIE_NAME && !cookie.value().is_empty() {
                return Ok(cookie.value().to_string());
            }
        }
    }

    Err(AppError::Unauthorized(
        "Missing session token. Provide 'Authorization: Bearer <token>' or the 'jwt' cookie."
            .to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(axum::http::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_bearer_token_extracted() {
        let map = headers(&[(AUTHORIZATION, "Bearer  abc.def.ghi ")]);
        assert_eq!(session_token(&map).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_cookie_token_extracted() {
        let map = headers(&[(COOKIE, "theme=dark; jwt=abc.def.ghi; lang=en")]);
        assert_eq!(session_token(&map).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_preferred_over_cookie() {
        let map = headers(&[(AUTHORIZATION, "Bearer from-header"), (COOKIE, "jwt=from-cookie")]);
        assert_eq!(session_token(&map).unwrap(), "from-header");
    }

    #[test]
    fn test_missing_token_is_unauthorized() {
        let map = headers(&[(AUTHORIZATION, "Basic dXNlcjpwYXNz"), (COOKIE, "jwt=")]);
        assert!(matches!(session_token(&map), Err(AppError::Unauthorized(_))));
        assert!(matches!(session_token(&HeaderMap::new()), Err(AppError::Unauthorized(_))));
    }
}
