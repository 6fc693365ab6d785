use serde::Deserialize;

use std::{fmt, time::Duration};

/// Upper bound for a single request, a pool checkout and the shutdown drain.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub const MAX_TITLE_LEN: usize = 255;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment configuration: {0}")]
    Env(#[from] envy::Error),
}

/// `DB_SSL_MODE`, spelled the way libpq spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SslMode {
    #[default]
    Disable,
    #[serde(alias = "allow")]
    Prefer,
    #[serde(alias = "verify-ca", alias = "verify-full")]
    Require,
}

#[derive(Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_host")]
    pub db_host: String,
    #[serde(default = "default_db_port")]
    pub db_port: u16,
    #[serde(default = "default_db_user")]
    pub db_user: String,
    #[serde(default)]
    pub db_password: String,
    #[serde(default = "default_db_name")]
    pub db_name: String,
    #[serde(default)]
    pub db_ssl_mode: SslMode,
    #[serde(default = "default_db_pool_size")]
    pub db_pool_size: usize,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
    #[serde(default = "default_api_base_path")]
    api_base_path: String,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

const fn default_db_port() -> u16 {
    5432
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_name() -> String {
    "notes".to_string()
}

const fn default_db_pool_size() -> usize {
    16
}

const fn default_server_port() -> u16 {
    8080
}

fn default_api_base_path() -> String {
    "/api/v1".to_string()
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        envy::from_env::<Self>().map_err(Into::into)
    }

    /// Base path with a single leading slash and no trailing slash.
    /// Empty when the API is mounted at the root.
    pub fn api_base_path(&self) -> String {
        let trimmed = self.api_base_path.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_user", &self.db_user)
            .field("db_password", &"<redacted>")
            .field("db_name", &self.db_name)
            .field("db_ssl_mode", &self.db_ssl_mode)
            .field("db_pool_size", &self.db_pool_size)
            .field("server_port", &self.server_port)
            .field("api_base_path", &self.api_base_path())
            .finish()
    }
}

/// Seeds the process environment from `.env` if one exists.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {
            tracing::info!("No .env file found, using environment variables");
        }
        Err(e) => tracing::warn!("Failed to read .env file: {e}"),
    }
}
