//! Configuration types for Parley.
//!
//! `ParleyConfig` represents the top-level `config.toml` that controls the
//! database location, token signing, the HTTP listener, and history paging.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Parley backend.
///
/// Loaded from `~/.parley/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParleyConfig {
    /// Explicit database URL. When unset, `{data_dir}/parley.db` is used.
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default)]
    pub jwt: JwtConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

/// Session token signing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HMAC signing secret. Overridden by `PARLEY_JWT_SECRET`.
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(default = "default_lifetime_secs")]
    pub lifetime_secs: i64,
}

fn default_audience() -> String {
    "parley".to_string()
}

fn default_lifetime_secs() -> i64 {
    86_400
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            audience: default_audience(),
            lifetime_secs: default_lifetime_secs(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Mark session cookies `Secure` (HTTPS deployments).
    #[serde(default)]
    pub secure_cookies: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8077
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            secure_cookies: false,
        }
    }
}

/// History paging defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: i32,
}

fn default_page_size() -> i32 {
    200
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
        }
    }
}
