//! qail-sql configuration

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{QailError, QailResult};
use crate::transpiler::Dialect;

/// Environment variable overriding `database.url`.
pub const DATABASE_URL_ENV: &str = "QAIL_SQL_DATABASE_URL";

/// File looked up in the working directory.
pub const LOCAL_CONFIG: &str = "qail-sql.toml";

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// `[database]` section
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: Option<String>,

    /// Dialect override; derived from the URL scheme when absent
    pub dialect: Option<Dialect>,

    /// Pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            dialect: None,
            max_connections: default_max_connections(),
        }
    }
}

/// `[log]` section
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// tracing-subscriber `EnvFilter` directive
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> QailResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Otherwise `./qail-sql.toml` and then
    /// `<config dir>/qail-sql/config.toml` are tried, falling back to defaults.
    /// `QAIL_SQL_DATABASE_URL` overrides the URL in every case.
    pub fn load(path: Option<&Path>) -> QailResult<Self> {
        let mut config = match path {
            Some(path) => Self::read(path)?,
            None => match Self::candidates().into_iter().find(|p| p.is_file()) {
                Some(found) => Self::read(&found)?,
                None => Self::default(),
            },
        };

        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            if !url.is_empty() {
                config.database.url = Some(url);
            }
        }
        Ok(config)
    }

    fn read(path: &Path) -> QailResult<Self> {
        debug!(path = %path.display(), "reading configuration");
        let text = std::fs::read_to_string(path).map_err(|e| {
            QailError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    fn candidates() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("qail-sql").join("config.toml"));
        }
        paths
    }
}
