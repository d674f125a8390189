//! Config management use case

use crate::error::{ProdlogError, Result};
use crate::infrastructure::{Config, FileSystemRepository, WorkspaceRepository};

/// Service for managing workspace configuration
pub struct ConfigService {
    repository: FileSystemRepository,
}

impl ConfigService {
    /// Create a new config service
    pub fn new(repository: FileSystemRepository) -> Self {
        ConfigService { repository }
    }

    /// Get a single config value
    pub fn get(&self, key: &str) -> Result<String> {
        let config = self.repository.load_config()?;

        match key {
            "api_base" => Ok(config.api_base),
            "timeout_secs" => Ok(config.timeout_secs.to_string()),
            "lists" => Ok(config.lists),
            "created" => Ok(config.created.to_rfc3339()),
            _ => Err(ProdlogError::Config(format!(
                "Unknown config key: '{}'. Valid keys are: api_base, timeout_secs, lists, created",
                key
            ))),
        }
    }

    /// Set a config value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.repository.load_config()?;
        let value = value.trim();

        match key {
            "api_base" => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(ProdlogError::Config(format!(
                        "api_base must be an http(s) URL, got '{}'",
                        value
                    )));
                }
                config.api_base = value.trim_end_matches('/').to_string();
            }
            "timeout_secs" => {
                config.timeout_secs = value
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| {
                        ProdlogError::Config(format!(
                            "timeout_secs must be a positive number of seconds, got '{}'",
                            value
                        ))
                    })?;
            }
            "lists" => {
                if value.is_empty() {
                    return Err(ProdlogError::Config("lists cannot be empty".to_string()));
                }
                config.lists = value.to_string();
            }
            "created" => {
                return Err(ProdlogError::Config(
                    "Cannot modify 'created' field (read-only)".to_string(),
                ));
            }
            _ => {
                return Err(ProdlogError::Config(format!(
                    "Unknown config key: '{}'. Valid keys are: api_base, timeout_secs, lists",
                    key
                )));
            }
        }

        tracing::info!(key, "config updated");
        self.repository.save_config(&config)?;
        Ok(())
    }

    /// List all config values
    pub fn list(&self) -> Result<Config> {
        self.repository.load_config()
    }
}
