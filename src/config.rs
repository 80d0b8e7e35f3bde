use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(#[from] envy::Error),

    #[error("{0} must be set for the {1} backend")]
    Missing(&'static str, &'static str),

    #[error("{0} must be > 0")]
    Zero(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    Http,
    Postgres,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Memory => "memory",
            Backend::Http => "http",
            Backend::Postgres => "postgres",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Environment configuration, e.g. `IDEA_STORE_BACKEND=http`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_backend")]
    pub idea_store_backend: Backend,

    pub idea_api_url: Option<String>,
    pub idea_api_token: Option<String>,
    #[serde(default = "default_api_timeout_secs")]
    pub idea_api_timeout_secs: u64,

    pub database_url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

fn default_backend() -> Backend {
    Backend::Memory
}

fn default_api_timeout_secs() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    5
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

/// Everything needed to open one idea store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSettings {
    Memory,
    Http {
        base_url: String,
        token: Option<String>,
        timeout: Duration,
    },
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter(vars)?)
    }

    /// Resolves the backend (a CLI override wins over the environment).
    pub fn store_settings(&self, backend: Option<Backend>) -> Result<StoreSettings, ConfigError> {
        let backend = backend.unwrap_or(self.idea_store_backend);

        match backend {
            Backend::Memory => Ok(StoreSettings::Memory),
            Backend::Http => {
                if self.idea_api_timeout_secs == 0 {
                    return Err(ConfigError::Zero("IDEA_API_TIMEOUT_SECS"));
                }
                let base_url = non_empty(&self.idea_api_url)
                    .ok_or(ConfigError::Missing("IDEA_API_URL", backend.as_str()))?;

                Ok(StoreSettings::Http {
                    base_url,
                    token: non_empty(&self.idea_api_token),
                    timeout: Duration::from_secs(self.idea_api_timeout_secs),
                })
            }
            Backend::Postgres => {
                if self.database_max_connections == 0 {
                    return Err(ConfigError::Zero("DATABASE_MAX_CONNECTIONS"));
                }
                let database_url = non_empty(&self.database_url)
                    .ok_or(ConfigError::Missing("DATABASE_URL", backend.as_str()))?;

                Ok(StoreSettings::Postgres {
                    database_url,
                    max_connections: self.database_max_connections,
                })
            }
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
