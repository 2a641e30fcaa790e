//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/sitebook/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/sitebook/` (~/.config/sitebook/)
//! - Data: `$XDG_DATA_HOME/sitebook/` (~/.local/share/sitebook/)
//! - State/Logs: `$XDG_STATE_HOME/sitebook/` (~/.local/state/sitebook/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Where the dataset lives
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Supported storage backends
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Relational tables in a SQLite file
    #[default]
    Sqlite,
    /// A single JSON document
    Json,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Sqlite => "sqlite",
            StorageBackend::Json => "json",
        }
    }

    /// Default file name in the data directory
    pub fn default_file_name(&self) -> &'static str {
        match self {
            StorageBackend::Sqlite => "data.db",
            StorageBackend::Json => "data.json",
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "json" => Ok(StorageBackend::Json),
            _ => Err(format!("unknown storage backend: {}", s)),
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Storage configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct StorageConfig {
    /// Backend type
    #[serde(default)]
    pub backend: StorageBackend,

    /// Override path for the store file
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolved store path: the override, or the backend's default in the data dir
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| Config::data_dir().join(self.backend.default_file_name()))
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/sitebook/config.toml` (~/.config/sitebook/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("sitebook").join("config.toml")
    }

    /// Returns the data directory path (for the store file)
    ///
    /// `$XDG_DATA_HOME/sitebook/` (~/.local/share/sitebook/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("sitebook")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/sitebook/` (~/.local/state/sitebook/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("sitebook")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/sitebook/sitebook.log` (~/.local/state/sitebook/sitebook.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("sitebook.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_DATA_HOME").is_err() {
            std::env::set_var("XDG_DATA_HOME", home.join(".local/share"));
        }

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}
