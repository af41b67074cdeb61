//! HS256 session tokens.
//!
//! Tokens use the compact JWS layout `header.claims.signature`, each segment
//! base64url without padding. Only `HS256` is accepted; the signature is an
//! HMAC-SHA256 over `header.claims` checked in constant time.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use parley_core::auth::capability::TokenCodec;
use parley_types::auth::{IssuedToken, SESSION_COOKIE_NAME, SessionCookie, TokenClaims};
use parley_types::error::AuthError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// `TokenCodec` signing with a process-wide HMAC secret.
pub struct Hs256TokenCodec {
    secret: SecretString,
    audience: String,
    lifetime: Duration,
}

fn invalid(reason: &str) -> AuthError {
    AuthError::TokenInvalid(reason.to_string())
}

/// A random 256-bit signing secret, base64url encoded.
///
/// Used when no secret is configured; tokens signed with it do not survive a
/// restart.
pub fn generate_secret() -> SecretString {
    let mut key = [0u8; 32];
    OsRng.fill_bytes(&mut key);
    SecretString::from(URL_SAFE_NO_PAD.encode(key))
}

impl Hs256TokenCodec {
    /// Build a codec. An empty secret or a non-positive lifetime is rejected.
    pub fn new(secret: SecretString, audience: &str, lifetime_secs: i64) -> Result<Self, AuthError> {
        if secret.expose_secret().is_empty() {
            return Err(AuthError::Validation("jwt secret must not be empty".to_string()));
        }
        if lifetime_secs <= 0 {
            return Err(AuthError::Validation(format!(
                "token lifetime must be positive, got {lifetime_secs}"
            )));
        }
        Ok(Self {
            secret,
            audience: audience.to_string(),
            lifetime: Duration::seconds(lifetime_secs),
        })
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| AuthError::TokenInvalid(format!("invalid signing key: {e}")))
    }

    fn encode_segment<T: Serialize>(value: &T) -> Result<String, AuthError> {
        let json = serde_json::to_vec(value)
            .map_err(|e| AuthError::TokenInvalid(format!("encode failed: {e}")))?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, AuthError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(segment)
            .map_err(|_| invalid("malformed token"))?;
        serde_json::from_slice(&bytes).map_err(|_| invalid("malformed token"))
    }
}

impl TokenCodec for Hs256TokenCodec {
    fn issue(&self, user_id: i32, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let expires_at = now + self.lifetime;
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        };
        let claims = TokenClaims {
            sub: user_id.to_string(),
            aud: self.audience.clone(),
            jti: Uuid::now_v7().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let signing_input = format!(
            "{}.{}",
            Self::encode_segment(&header)?,
            Self::encode_segment(&claims)?
        );
        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(IssuedToken {
            token: format!("{signing_input}.{signature}"),
            expires_at,
        })
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError> {
        let mut parts = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid("malformed token"));
        };

        let header: Header = Self::decode_segment(header_b64)?;
        if header.alg != ALGORITHM {
            return Err(invalid("unsupported algorithm"));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| invalid("malformed token"))?;
        let mut mac = self.mac()?;
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| invalid("signature mismatch"))?;

        let claims: TokenClaims = Self::decode_segment(claims_b64)?;
        if claims.exp <= now.timestamp() {
            return Err(invalid("token expired"));
        }
        if claims.aud != self.audience {
            return Err(invalid("audience mismatch"));
        }
        Ok(claims)
    }

    fn expired_cookie(&self, subject: &str, secure: bool, now: DateTime<Utc>) -> SessionCookie {
        SessionCookie {
            name: SESSION_COOKIE_NAME.to_string(),
            value: subject.to_string(),
            path: "/".to_string(),
            http_only: true,
            secure,
            expires: now - Duration::hours(24),
        }
    }
}
