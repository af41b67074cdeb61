//! Configuration loader for Parley.
//!
//! Reads `config.toml` from the data directory (`~/.parley/` in production)
//! into [`ParleyConfig`]. Falls back to defaults when the file is missing or
//! malformed, then applies environment overrides.

use std::path::Path;

use parley_types::config::ParleyConfig;

/// Environment variable that replaces `[jwt].secret`.
pub const JWT_SECRET_ENV: &str = "PARLEY_JWT_SECRET";

/// Load configuration from `{data_dir}/config.toml`, then apply env overrides.
pub async fn load_config(data_dir: &Path) -> ParleyConfig {
    let mut config = read_config_file(data_dir).await;
    apply_env_overrides(&mut config, std::env::var(JWT_SECRET_ENV).ok());
    config
}

async fn read_config_file(data_dir: &Path) -> ParleyConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ParleyConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ParleyConfig::default();
        }
    };

    match toml::from_str::<ParleyConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ParleyConfig::default()
        }
    }
}

/// A non-empty env secret wins over the file.
fn apply_env_overrides(config: &mut ParleyConfig, jwt_secret: Option<String>) {
    if let Some(secret) = jwt_secret.filter(|s| !s.is_empty()) {
        config.jwt.secret = secret;
    }
}

/// Database URL: explicit config value, else `{data_dir}/parley.db`.
pub fn resolve_database_url(config: &ParleyConfig, data_dir: &Path) -> String {
    config
        .database_url
        .clone()
        .unwrap_or_else(|| crate::sqlite::pool::database_url_for(data_dir))
}
