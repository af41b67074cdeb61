//! Argon2id password hashing.
//!
//! Implements `PasswordScheme` from `parley-core`. Hashes are PHC strings
//! (`$argon2id$v=19$...`) carrying their own salt and parameters, so
//! verification needs nothing besides the stored value.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use parley_core::auth::capability::PasswordScheme;
use parley_types::error::AuthError;
use tracing::warn;

/// Argon2id with the crate's default parameters.
#[derive(Default)]
pub struct Argon2PasswordScheme {
    argon2: Argon2<'static>,
}

impl Argon2PasswordScheme {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordScheme for Argon2PasswordScheme {
    fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    fn validate(&self, plaintext: &str, stored_hash: &str) -> bool {
        let parsed = match PasswordHash::new(stored_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Stored password hash is malformed");
                return false;
            }
        };
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}
