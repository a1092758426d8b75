use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, ShopchatError};

/// Top-level configuration for ShopChat.
///
/// Loaded from `~/.shopchat/config.toml` by default. Every section falls back
/// to its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopchatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl ShopchatConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ShopchatConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ShopchatError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Absolute path of the catalog database, resolved against `data_dir`.
    pub fn database_path(&self) -> PathBuf {
        let db = PathBuf::from(&self.server.database);
        if db.is_absolute() {
            db
        } else {
            self.general.resolved_data_dir().join(db)
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory for the SQLite database and credential store.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.shopchat".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl GeneralConfig {
    /// `data_dir` with a leading `~` expanded to the home directory.
    pub fn resolved_data_dir(&self) -> PathBuf {
        if let Some(rest) = self.data_dir.strip_prefix("~") {
            let home = std::env::var("HOME")
                .or_else(|_| std::env::var("USERPROFILE"))
                .unwrap_or_else(|_| ".".to_string());
            return PathBuf::from(home).join(rest.trim_start_matches(['/', '\\']));
        }
        PathBuf::from(&self.data_dir)
    }
}

/// Where the chat client finds the catalog service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL of the catalog HTTP service.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Reference catalog server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Database file, relative to `general.data_dir` unless absolute.
    pub database: String,
    /// Number of products generated into an empty catalog.
    pub seed_count: u32,
    /// Maximum products returned by the server-side chat endpoint.
    pub chat_result_limit: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            database: "shopchat.db".to_string(),
            seed_count: 100,
            chat_result_limit: 5,
        }
    }
}

/// Session and login settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Key under which the logged-in username is stored.
    pub credential_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            credential_key: crate::credentials::DEFAULT_CREDENTIAL_KEY.to_string(),
        }
    }
}
