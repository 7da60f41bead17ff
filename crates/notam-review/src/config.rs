//! Configuration management for notam-review.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "notam-review";

/// Default reference dataset file name.
const DATASET_FILE_NAME: &str = "db.csv";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `NOTAMREV_`)
/// 2. TOML config file at `~/.config/notam-review/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Form server configuration.
    pub server: ServerConfig,
    /// Reference dataset configuration.
    pub dataset: DatasetConfig,
    /// Feedback storage configuration.
    pub storage: StorageConfig,
    /// Remote upload configuration.
    pub upload: UploadConfig,
}

/// Form server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the form server binds to.
    pub bind_address: String,
    /// Port the form server listens on.
    pub port: u16,
    /// Access password required at login.
    /// When unset, login proceeds with a username only.
    pub access_password: Option<String>,
}

/// Reference dataset configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path to the frozen reference dataset CSV.
    /// Defaults to `~/.local/share/notam-review/db.csv`
    pub path: Option<PathBuf>,
    /// URL to download the dataset from when the file is missing.
    pub url: Option<String>,
}

/// Feedback storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the per-user feedback files.
    /// Defaults to `~/.local/share/notam-review`
    pub data_dir: Option<PathBuf>,
}

/// Remote upload configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Endpoint that accepts multipart feedback file uploads.
    pub endpoint: Option<String>,
    /// Bearer token sent with uploads.
    pub token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8484,
            access_password: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `NOTAMREV_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("NOTAMREV_").split("_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::ConfigValidation {
                message: "server port must be greater than 0".to_string(),
            });
        }

        if self.server.bind_address.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "server bind_address must not be empty".to_string(),
            });
        }

        if let Some(url) = &self.dataset.url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(Error::ConfigValidation {
                    message: format!("dataset url must be http(s), got: {url}"),
                });
            }
        }

        if let Some(endpoint) = &self.upload.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(Error::ConfigValidation {
                    message: format!("upload endpoint must be http(s), got: {endpoint}"),
                });
            }
        }

        Ok(())
    }

    /// Get the dataset path, resolving defaults if not set.
    #[must_use]
    pub fn dataset_path(&self) -> PathBuf {
        self.dataset
            .path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATASET_FILE_NAME))
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the feedback file path for a user.
    #[must_use]
    pub fn feedback_path(&self, username: &str) -> PathBuf {
        self.data_dir().join(format!("feedback_{username}.csv"))
    }

    /// Get the socket address the form server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.bind_address, "127.0.0.1");
        assert_eq!(config.server.port, 8484);
        assert!(config.server.access_password.is_none());
        assert!(config.dataset.path.is_none());
        assert!(config.dataset.url.is_none());
        assert!(config.upload.endpoint.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;

        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("port"));
    }

    #[test]
    fn test_validate_empty_bind_address() {
        let mut config = Config::default();
        config.server.bind_address = "  ".to_string();

        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("bind_address"));
    }

    #[test]
    fn test_validate_bad_dataset_url() {
        let mut config = Config::default();
        config.dataset.url = Some("ftp://example.com/db.csv".to_string());

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("dataset url"));
    }

    #[test]
    fn test_validate_bad_upload_endpoint() {
        let mut config = Config::default();
        config.upload.endpoint = Some("not-a-url".to_string());

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("upload endpoint"));
    }

    #[test]
    fn test_validate_good_urls() {
        let mut config = Config::default();
        config.dataset.url = Some("https://example.com/db.csv".to_string());
        config.upload.endpoint = Some("https://example.com/upload".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dataset_path_default() {
        let config = Config::default();
        let path = config.dataset_path();
        assert!(path.to_string_lossy().contains("db.csv"));
    }

    #[test]
    fn test_dataset_path_custom() {
        let mut config = Config::default();
        config.dataset.path = Some(PathBuf::from("/custom/db.csv"));
        assert_eq!(config.dataset_path(), PathBuf::from("/custom/db.csv"));
    }

    #[test]
    fn test_feedback_path() {
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/data"));
        assert_eq!(
            config.feedback_path("alice"),
            PathBuf::from("/data/feedback_alice.csv")
        );
    }

    #[test]
    fn test_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:8484");
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("notam-review"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_default_data_dir() {
        let path = Config::default_data_dir();
        assert!(path.to_string_lossy().contains("notam-review"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());

        let config = result.unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_server_config_serialize() {
        let server = ServerConfig::default();
        let json = serde_json::to_string(&server).unwrap();
        assert!(json.contains("bind_address"));
    }

    #[test]
    fn test_server_config_deserialize() {
        let json = r#"{"bind_address": "0.0.0.0", "port": 9000}"#;
        let server: ServerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(server.bind_address, "0.0.0.0");
        assert_eq!(server.port, 9000);
    }

    #[test]
    fn test_config_clone() {
        let config = Config::default();
        let cloned = config.clone();
        assert_eq!(config, cloned);
    }
}
