use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Result, anyhow};

use crate::client::{DEFAULT_SERVICE_URL, DEFAULT_TIMEOUT};

/// Overrides the configured prediction service URL.
pub const SERVICE_URL_ENV: &str = "HUURPRIJS_API_URL";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub service_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the user config directory; a missing file yields defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| anyhow!("Invalid config file {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Environment variable first, then the config file, then the default.
    pub fn service_url(&self) -> String {
        self.resolve_service_url(std::env::var(SERVICE_URL_ENV).ok())
    }

    fn resolve_service_url(&self, from_env: Option<String>) -> String {
        from_env
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.service_url.clone())
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string())
    }

    pub fn timeout(&self) -> Duration {
        match self.timeout_secs {
            Some(secs) if secs > 0 => Duration::from_secs(secs),
            _ => DEFAULT_TIMEOUT,
        }
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("huurprijs").join("config.json"))
    }

    /// Where the log file should go, most preferred first.
    pub fn log_file_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("huurprijs").join("logs").join("huurprijs.log"));
        }
        candidates.push(PathBuf::from(".huurprijs").join("logs").join("huurprijs.log"));

        candidates
    }
}
