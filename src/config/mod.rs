//! Configuration management for Memaster

pub mod schema;

pub use schema::Config;

use crate::error::{AgentError, AgentResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("memaster")
            .join("config.toml")
    }

    /// Get the platform state directory path
    pub fn default_state_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("memaster")
    }

    /// Get the state directory for a config, honoring `storage.state_dir`
    pub fn state_dir(config: &Config) -> PathBuf {
        config
            .storage
            .state_dir
            .clone()
            .unwrap_or_else(Self::default_state_dir)
    }

    /// Get the cache storage root
    pub fn caches_dir(config: &Config) -> PathBuf {
        Self::state_dir(config).join("caches")
    }

    /// Get the host state file path
    pub fn host_state_path(config: &Config) -> PathBuf {
        Self::state_dir(config).join("host.json")
    }

    /// Get the lifecycle journal path
    pub fn journal_path(config: &Config) -> PathBuf {
        Self::state_dir(config).join("journal.log")
    }

    /// Load configuration, falling back to defaults if not present
    pub async fn load(&self) -> AgentResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> AgentResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| AgentError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| AgentError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> AgentResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            AgentError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> AgentResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AgentError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Ensure all state directories exist
    pub async fn ensure_state_dirs(config: &Config) -> AgentResult<()> {
        let dirs = [Self::state_dir(config), Self::caches_dir(config)];

        for dir in &dirs {
            fs::create_dir_all(dir).await.map_err(|e| {
                AgentError::io(format!("creating directory {}", dir.display()), e)
            })?;
        }

        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        let manager = ConfigManager::with_path(path);

        let config = manager.load().await.unwrap();
        assert_eq!(config.agent.version, "memaster-v1.4.0");
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        let manager = ConfigManager::with_path(path);

        let mut config = Config::default();
        config.agent.version = "memaster-test".to_string();

        manager.save(&config).await.unwrap();
        let loaded = manager.load().await.unwrap();

        assert_eq!(loaded.agent.version, "memaster-test");
    }

    #[tokio::test]
    async fn invalid_file_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        tokio::fs::write(&path, "[agent\nversion = 3").await.unwrap();

        let err = ConfigManager::with_path(path.clone()).load().await.unwrap_err();
        match err {
            AgentError::ConfigInvalid { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn state_dir_override() {
        let mut config = Config::default();
        config.storage.state_dir = Some(PathBuf::from("/tmp/memaster-state"));

        assert_eq!(
            ConfigManager::caches_dir(&config),
            PathBuf::from("/tmp/memaster-state/caches")
        );
        assert_eq!(
            ConfigManager::host_state_path(&config),
            PathBuf::from("/tmp/memaster-state/host.json")
        );
    }
}
