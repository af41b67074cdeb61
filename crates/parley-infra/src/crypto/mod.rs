//! Cryptographic adapters for the auth gateway.
//!
//! - `password`: argon2id PHC hashing behind `PasswordScheme`
//! - `token`: HS256-signed session tokens behind `TokenCodec`

pub mod password;
pub mod token;
