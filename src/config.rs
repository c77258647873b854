//! User configuration
//!
//! Stored as JSON at `<config dir>/codescent/config.json`. A missing or
//! unreadable file yields the defaults; the app never refuses to start over
//! its config.

use crate::build_info;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the configured backend URL
pub const API_URL_ENV: &str = "CODESCENT_API_URL";

pub const DEFAULT_USERNAME_DEBOUNCE_MS: u64 = 2000;
pub const DEFAULT_MEMBER_SEARCH_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the REST API, e.g. `http://localhost:8000/api/v1`
    pub api_base_url: String,
    pub username_debounce_ms: u64,
    pub member_search_debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: build_info::BAKED_API_URL.to_string(),
            username_debounce_ms: DEFAULT_USERNAME_DEBOUNCE_MS,
            member_search_debounce_ms: DEFAULT_MEMBER_SEARCH_DEBOUNCE_MS,
        }
    }
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("codescent").join("config.json"))
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().context("No config directory on this platform")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Apply overrides in precedence order: CLI flag, then environment.
    pub fn with_overrides(mut self, cli_api_url: Option<&str>, env_api_url: Option<&str>) -> Self {
        let chosen = cli_api_url
            .or(env_api_url)
            .map(str::trim)
            .filter(|u| !u.is_empty());
        if let Some(url) = chosen {
            self.api_base_url = url.to_string();
        }
        self
    }

    /// `with_overrides` reading the environment itself
    pub fn resolve(self, cli_api_url: Option<&str>) -> Self {
        let env = std::env::var(API_URL_ENV).ok();
        self.with_overrides(cli_api_url, env.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json"));
        assert_eq!(config, Config::default());
        assert_eq!(config.username_debounce_ms, 2000);
        assert_eq!(config.member_search_debounce_ms, 500);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            api_base_url: "https://smells.example.com/api/v1".into(),
            username_debounce_ms: 750,
            member_search_debounce_ms: 250,
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "api_base_url": "http://10.0.0.2:8000/api/v1" }"#).unwrap();
        let config = Config::load_from(&path);
        assert_eq!(config.api_base_url, "http://10.0.0.2:8000/api/v1");
        assert_eq!(config.username_debounce_ms, DEFAULT_USERNAME_DEBOUNCE_MS);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_cli_beats_env() {
        let config = Config::default().with_overrides(Some("http://cli"), Some("http://env"));
        assert_eq!(config.api_base_url, "http://cli");

        let config = Config::default().with_overrides(None, Some("http://env"));
        assert_eq!(config.api_base_url, "http://env");

        let config = Config::default().with_overrides(Some("  "), None);
        assert_eq!(config.api_base_url, build_info::BAKED_API_URL);
    }
}
