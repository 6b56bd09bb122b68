//! Application configuration management.
//!
//! The Worth backend endpoint is fixed configuration, not runtime-discovered:
//! scheme, host, port, and API base path live here together with the request
//! timeout. Values load from `~/.config/worth-pos/config.json` when present
//! and can be overridden per-environment with `WORTH_API_*` variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for the config directory path
const APP_NAME: &str = "worth-pos";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Production API host
const DEFAULT_HOST: &str = "api.worth.hiro.io";

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while still failing fast enough for a
/// register queue.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    pub base_path: String,
    pub timeout_secs: u64,
    pub last_username: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            host: DEFAULT_HOST.to_string(),
            port: None,
            base_path: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            last_username: None,
        }
    }
}

impl Config {
    /// Load configuration from disk, then apply environment overrides.
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if not found)
        let _ = dotenvy::dotenv();

        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(&path).context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
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

    fn apply_env_overrides(&mut self) {
        if let Ok(scheme) = env::var("WORTH_API_SCHEME") {
            self.scheme = scheme;
        }
        if let Ok(host) = env::var("WORTH_API_HOST") {
            self.host = host;
        }
        if let Ok(port) = env::var("WORTH_API_PORT") {
            if let Ok(port) = port.parse() {
                self.port = Some(port);
            }
        }
        if let Ok(base_path) = env::var("WORTH_API_BASE_PATH") {
            self.base_path = base_path;
        }
        if let Ok(timeout) = env::var("WORTH_API_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout.parse() {
                self.timeout_secs = timeout;
            }
        }
    }
}
