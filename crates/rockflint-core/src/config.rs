//! Application configuration management.
//!
//! `ClientConfig` is read once from the process environment at startup
//! (API base URL, request timeout, state directory). `Config` holds the
//! small amount of user preference state kept between runs and is stored
//! at `~/.config/rockflint/config.json`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_TIMEOUT_SECS;

/// Application name used for config/state directory paths
const APP_NAME: &str = "rockflint";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const ENV_BASE_URL: &str = "ROCKFLINT_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "ROCKFLINT_REQUEST_TIMEOUT_SECS";
pub const ENV_STATE_DIR: &str = "ROCKFLINT_STATE_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Ok(serde_json::from_str(&contents).context("Failed to parse config file")?)
        } else {
            Ok(Self::default())
        }
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

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

/// Runtime settings for the API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    /// Directory holding the persisted credential snapshot and logs.
    pub state_dir: PathBuf,
}

impl ClientConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_BASE_URL)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow::anyhow!("{} is not set", ENV_BASE_URL))?;

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            anyhow::bail!("{} must be an http(s) URL, got {:?}", ENV_BASE_URL, base_url);
        }

        let request_timeout = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let state_dir = match lookup(ENV_STATE_DIR).filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => Self::default_state_dir()?,
        };

        Ok(Self {
            base_url,
            request_timeout,
            state_dir,
        })
    }

    fn default_state_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_full() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://api.rockflint.test/"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_STATE_DIR, "/tmp/rockflint-state"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://api.rockflint.test");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.state_dir, PathBuf::from("/tmp/rockflint-state"));
    }

    #[test]
    fn test_default_timeout() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "http://localhost:8000"),
            (ENV_STATE_DIR, "/tmp/x"),
        ]))
        .unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_missing_or_bad_base_url() {
        assert!(ClientConfig::from_lookup(lookup(&[])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[(ENV_BASE_URL, "  ")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[(ENV_BASE_URL, "api.example.com")])).is_err());
    }

    #[test]
    fn test_bad_timeout() {
        let result = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "http://localhost:8000"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]));
        assert!(result.is_err());
    }
}
