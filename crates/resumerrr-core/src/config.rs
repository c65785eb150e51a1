use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use anyhow::{Result, anyhow};

use crate::analyzer::DEFAULT_ENDPOINT;

pub const ENDPOINT_ENV: &str = "RESUMERRR_ENDPOINT";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub endpoint: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    /// Load the config file, falling back to defaults if it can't be read
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read config file, using defaults");
            Self::new()
        })
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, config_content)?;
        tracing::info!(path = %config_path.display(), "saved config");
        Ok(())
    }

    /// Pick the endpoint: explicit override, then the environment, then the
    /// config file, then the built-in default.
    pub fn resolve_endpoint(&self, cli_override: Option<&str>) -> String {
        let env_value = std::env::var(ENDPOINT_ENV).ok();
        pick_endpoint(cli_override, env_value.as_deref(), self.endpoint.as_deref())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("resumerrr").join("config.json"))
    }
}

fn pick_endpoint(cli: Option<&str>, env: Option<&str>, file: Option<&str>) -> String {
    [cli, env, file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_ENDPOINT)
        .to_string()
}
