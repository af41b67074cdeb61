//! Password and token capabilities consumed by the auth gateway.
//!
//! Defined in parley-core so `AuthUserService` can check credentials and sign
//! tokens without coupling to a specific algorithm. The argon2 and HS256
//! adapters live in parley-infra.

use chrono::{DateTime, Utc};
use parley_types::auth::{IssuedToken, SessionCookie, TokenClaims};
use parley_types::error::AuthError;

/// Password hashing and verification.
pub trait PasswordScheme: Send + Sync {
    /// Hash a plaintext password into a self-describing string for storage.
    fn hash(&self, plaintext: &str) -> Result<String, AuthError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// Malformed stored hashes validate as `false`.
    fn validate(&self, plaintext: &str, stored_hash: &str) -> bool;
}

/// Signing and verification of session tokens.
///
/// The signing secret is process-wide configuration owned by the implementor.
pub trait TokenCodec: Send + Sync {
    /// Sign a token for a user, issued at `now`.
    fn issue(&self, user_id: i32, now: DateTime<Utc>) -> Result<IssuedToken, AuthError>;

    /// Verify signature, audience, and expiry (relative to `now`).
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError>;

    /// A cookie that makes the browser drop the session.
    fn expired_cookie(&self, subject: &str, secure: bool, now: DateTime<Utc>) -> SessionCookie;
}
