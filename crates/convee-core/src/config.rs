//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! backend URL, collection, page size, request timeout, where the session is
//! stored, and the last email used to log in.
//!
//! Configuration is stored at `~/.config/convee-admin/config.json`. The
//! `CONVEE_URL` and `CONVEE_COLLECTION` environment variables take precedence.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::{DEFAULT_BASE_URL, REQUEST_TIMEOUT_SECS};
use crate::auth::{FileStorage, KeychainStorage, SessionStorage};
use crate::models::INQUIRIES_COLLECTION;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "convee-admin";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Rows requested per fetch unless configured otherwise
const DEFAULT_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// `session.json` in the cache directory
    #[default]
    File,
    /// OS keychain entry
    Keychain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: String,
    pub collection: String,
    pub page_limit: u32,
    pub request_timeout_secs: u64,
    pub storage: StorageKind,
    pub last_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BASE_URL.to_string(),
            collection: INQUIRIES_COLLECTION.to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            storage: StorageKind::File,
            last_email: None,
        }
    }
}

impl Config {
    /// Load from disk, then apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")?
        } else {
            Self::default()
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("CONVEE_URL").filter(|v| !v.trim().is_empty()) {
            self.backend_url = url;
        }
        if let Some(collection) = lookup("CONVEE_COLLECTION").filter(|v| !v.trim().is_empty()) {
            self.collection = collection;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// The session storage selected by `storage`
    pub fn open_storage(&self) -> Result<Box<dyn SessionStorage>> {
        match self.storage {
            StorageKind::File => Ok(Box::new(FileStorage::new(self.cache_dir()?))),
            StorageKind::Keychain => Ok(Box::new(KeychainStorage::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend_url, "https://db.convee.de/");
        assert_eq!(config.collection, "anfragen");
        assert_eq!(config.page_limit, 100);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.storage, StorageKind::File);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"storage":"keychain","last_email":"a@b.com"}"#)
                .expect("parse");
        assert_eq!(config.storage, StorageKind::Keychain);
        assert_eq!(config.last_email.as_deref(), Some("a@b.com"));
        assert_eq!(config.collection, "anfragen");
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default().with_env_overrides(|key| match key {
            "CONVEE_URL" => Some("http://localhost:8055".to_string()),
            "CONVEE_COLLECTION" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.backend_url, "http://localhost:8055");
        assert_eq!(config.collection, "anfragen");
    }

    #[test]
    fn test_zero_timeout_clamped() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }
}
