//! Configuration for the rowing agent.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::store::DEFAULT_ROOT_COLLECTION;

/// Main configuration for the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the remote session store.
    pub store_url: String,

    /// Root collection the session documents live under.
    pub store_root: String,

    /// Store request timeout in seconds.
    pub store_timeout_secs: u64,

    /// Path for local state (session counter).
    pub data_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("carbon-rowing-agent");

        Self {
            store_url: "https://carbonrowing-default-rtdb.firebaseio.com".to_string(),
            store_root: DEFAULT_ROOT_COLLECTION.to_string(),
            store_timeout_secs: 10,
            data_path: data_dir,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("carbon-rowing-agent")
            .join("config.json")
    }

    /// Ensure the data directory exists.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.data_path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Store configuration derived from this config.
    pub fn store_config(&self) -> crate::store::StoreConfig {
        crate::store::StoreConfig {
            base_url: self.store_url.clone(),
            root: self.store_root.clone(),
            timeout_secs: self.store_timeout_secs,
        }
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.store_root, DEFAULT_ROOT_COLLECTION);
        assert_eq!(config.store_timeout_secs, 10);
        assert!(config.store_url.starts_with("https://"));
    }

    #[test]
    fn test_store_config_derivation() {
        let mut config = Config::default();
        config.store_url = "https://example.test".to_string();
        let store = config.store_config();
        assert_eq!(store.session_url(0), "https://example.test/All_User_Data/0.json");
    }
}
