//! Infrastructure layer for Parley.
//!
//! Contains implementations of the repository and capability traits defined in
//! `parley-core`: SQLite storage, argon2 password hashing, HS256 session tokens,
//! and the TOML config loader.

pub mod config;
pub mod crypto;
pub mod sqlite;
