// src/config.rs
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{
    net::{IpAddr, Ipv4Addr},
    path::{Path, PathBuf},
    time::Duration,
};

use crate::startup::{RetryPolicy, StartupError};

/// Env var naming an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "PRODUCT_CATALOG_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "appsettings.toml";

/// Prefix for environment overrides; `__` separates nested keys (`APP_DATABASE__URL`).
const ENV_PREFIX: &str = "APP_";

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default tracing filter, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub startup: StartupConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Postgres connection string. Required.
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// First port tried; the next twenty are probed when it is taken.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding `index.html` and `app.js`.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StartupConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            database: DatabaseConfig::default(),
            server: ServerConfig::default(),
            startup: StartupConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

impl StartupConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            delay: Duration::from_secs(self.retry_delay_secs),
        }
    }
}

impl Config {
    /// Loads the file named by `PRODUCT_CATALOG_CONFIG`, or `appsettings.toml`.
    pub fn load() -> Result<Self, StartupError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::from_file(&path)
    }

    /// Defaults, then the TOML file, then `APP_*` environment variables.
    ///
    /// The file is mandatory and `database.url` must be non-empty.
    pub fn from_file(path: &Path) -> Result<Self, StartupError> {
        if !path.is_file() {
            return Err(StartupError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let cfg: Self = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| {
                StartupError::Config(format!("failed to read {}: {e}", path.display()))
            })?;

        if cfg.database.url.trim().is_empty() {
            return Err(StartupError::Config(
                "database.url must be set and non-empty".to_string(),
            ));
        }
        Ok(cfg)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("wwwroot")
}

fn default_max_attempts() -> u32 {
    RetryPolicy::default().max_attempts
}

fn default_retry_delay_secs() -> u64 {
    RetryPolicy::default().delay.as_secs()
}
