//! Authenticated user, token, and cookie types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user.
///
/// `password` holds the stored hash (PHC string). It is never serialized, so
/// handing an `AuthUser` to an HTTP response cannot leak it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub is_superuser: bool,
    pub is_active: bool,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// A user registration request carrying the plaintext password.
///
/// The auth service hashes the password before anything reaches storage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAuthUser {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub is_staff: bool,
}

/// Insert parameters for the user table. `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct CreateAuthUserParams {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub is_superuser: bool,
    pub is_active: bool,
    pub is_staff: bool,
}

/// Profile update for an existing user.
#[derive(Debug, Clone)]
pub struct UpdateAuthUserParams {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Claims carried by a signed session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user id as a decimal string.
    pub sub: String,
    pub aud: String,
    /// Unique token id, used as the revocation key.
    pub jti: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl TokenClaims {
    /// Parse the subject back into a user id.
    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }

    /// Expiry as a UTC timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// A freshly signed token with its expiry.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Name of the cookie that carries the session token.
pub const SESSION_COOKIE_NAME: &str = "jwt";

/// A cookie value the HTTP layer turns into a `Set-Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub http_only: bool,
    pub secure: bool,
    pub expires: DateTime<Utc>,
}

impl SessionCookie {
    /// True when a browser would discard this cookie at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }
}
