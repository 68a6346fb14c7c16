//! Configuration management for the comick tier list.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    pub data: DataConfig,

    /// Snapshot persistence settings
    pub storage: StorageConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Comick import settings
    pub comick: ComickConfig,

    /// Import proxy server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root data directory path
    pub root_dir: String,
}

/// Snapshot persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Primary store database (relative to data directory or absolute)
    pub database: String,

    /// Fallback cookie jar file (relative to data directory or absolute)
    pub cookie_jar: String,

    /// Key the snapshot is stored under
    pub key: String,

    /// Largest payload the cookie fallback accepts
    pub max_cookie_bytes: usize,

    /// Idle delay before edits are written
    pub save_delay_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Comick import configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComickConfig {
    /// Site the follow lists are read from
    pub base_url: String,

    /// Host serving cover images
    pub image_base_url: String,

    /// Import through a running proxy instead of contacting the site directly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Import proxy server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the proxy listens on
    pub bind: String,
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// File name prefix of exported files
    pub prefix: String,

    /// Output directory (relative to data directory or absolute)
    pub dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            prefix: "comick-tierlist".to_string(),
            dir: "exports".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                root_dir: "data".to_string(),
            },
            storage: StorageConfig {
                database: "tierlist.db".to_string(),
                cookie_jar: "cookies.txt".to_string(),
                key: crate::store::STORAGE_KEY.to_string(),
                max_cookie_bytes: crate::store::MAX_COOKIE_BYTES,
                save_delay_ms: 500,
            },
            logging: LoggingConfig {
                log_dir: "logs".to_string(),
                default_level: "info".to_string(),
                console: true,
                file: true,
                json_format: false,
            },
            comick: ComickConfig {
                base_url: "https://comick.dev".to_string(),
                image_base_url: "https://meo.comick.pictures".to_string(),
                proxy_url: None,
                timeout_secs: 30,
            },
            server: ServerConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir().join(path)
        }
    }

    /// Get the absolute path for the primary store database
    pub fn database_path(&self) -> PathBuf {
        self.resolve(&self.storage.database)
    }

    /// Get the absolute path for the fallback cookie jar
    pub fn cookie_jar_path(&self) -> PathBuf {
        self.resolve(&self.storage.cookie_jar)
    }

    /// Get the absolute path for the log directory
    pub fn log_dir(&self) -> PathBuf {
        self.resolve(&self.logging.log_dir)
    }

    /// Get the absolute path for exported files
    pub fn export_dir(&self) -> PathBuf {
        self.resolve(&self.export.dir)
    }

    pub fn save_delay(&self) -> Duration {
        Duration::from_millis(self.storage.save_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.comick.timeout_secs)
    }
}
