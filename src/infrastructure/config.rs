//! Configuration management

use crate::error::{ProdlogError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LISTS: &str = "lists.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the batch sink and frequency endpoints
    pub api_base: String,
    /// Request timeout used for submission and provider calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Option lists source: path relative to the workspace root, or an http(s) URL
    #[serde(default = "default_lists")]
    pub lists: String,
    pub created: DateTime<Utc>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_lists() -> String {
    DEFAULT_LISTS.to_string()
}

impl Config {
    /// Create a new config with default values
    pub fn new(api_base: Option<String>) -> Self {
        Config {
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            lists: DEFAULT_LISTS.to_string(),
            created: Utc::now(),
        }
    }

    /// Load config from .prodlog/config.toml in the given directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(".prodlog").join("config.toml");

        let contents = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ProdlogError::NotProdlogDirectory(path.to_path_buf())
            } else {
                ProdlogError::Io(e)
            }
        })?;

        toml::from_str(&contents)
            .map_err(|e| ProdlogError::Config(format!("Failed to parse config.toml: {}", e)))
    }

    /// Save config to .prodlog/config.toml in the given directory
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        let prodlog_dir = path.join(".prodlog");
        let config_path = prodlog_dir.join("config.toml");

        if !prodlog_dir.exists() {
            fs::create_dir(&prodlog_dir)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| ProdlogError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Sink base URL, with PRODLOG_API_BASE taking precedence
    pub fn get_api_base(&self) -> String {
        std::env::var("PRODLOG_API_BASE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.api_base.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
