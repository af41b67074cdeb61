//! `Set-Cookie` rendering for session cookies.

use axum::http::HeaderValue;
use cookie::time::OffsetDateTime;
use cookie::{Cookie, SameSite};
use parley_types::auth::{IssuedToken, SESSION_COOKIE_NAME, SessionCookie};

use crate::http::error::AppError;

/// The cookie carrying a freshly issued token, expiring with it.
pub fn login_cookie(issued: &IssuedToken, secure: bool) -> SessionCookie {
    SessionCookie {
        name: SESSION_COOKIE_NAME.to_string(),
        value: issued.token.clone(),
        path: "/".to_string(),
        http_only: true,
        secure,
        expires: issued.expires_at,
    }
}

/// Render a session cookie as a `Set-Cookie` header value.
pub fn set_cookie_header(session: &SessionCookie) -> Result<HeaderValue, AppError> {
    let expires = OffsetDateTime::from_unix_timestamp(session.expires.timestamp())
        .map_err(|e| AppError::Internal(format!("cookie expiry out of range: {e}")))?;

    let cookie = Cookie::build((session.name.clone(), session.value.clone()))
        .path(session.path.clone())
        .http_only(session.http_only)
        .secure(session.secure)
        .same_site(SameSite::Lax)
        .expires(expires)
        .build();

    HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| AppError::Internal(format!("invalid cookie header: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_login_cookie_renders_token_and_flags() {
        let issued = IssuedToken {
            token: "aaa.bbb.ccc".to_string(),
            expires_at: Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap(),
        };
        let header = set_cookie_header(&login_cookie(&issued, false)).unwrap();
        let value = header.to_str().unwrap();

        assert!(value.starts_with("jwt=aaa.bbb.ccc"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("Path=/"));
        assert!(value.contains("Expires=Wed, 02 Jan 2030 03:04:05 GMT"));
        assert!(!value.contains("Secure"));
    }

    #[test]
    fn test_expired_cookie_renders_past_date() {
        let session = SessionCookie {
            name: SESSION_COOKIE_NAME.to_string(),
            value: "7".to_string(),
            path: "/".to_string(),
            http_only: true,
            secure: true,
            expires: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() - Duration::hours(24),
        };
        let header = set_cookie_header(&session).unwrap();
        let value = header.to_str().unwrap();

        assert!(value.starts_with("jwt=7"));
        assert!(value.contains("Secure"));
        assert!(value.contains("Expires=Thu, 29 Feb 2024 00:00:00 GMT"));
    }
}
