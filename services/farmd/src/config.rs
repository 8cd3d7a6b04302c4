//! Configuration types and loading
//!
//! Config precedence: CLI arg > CONFIG_PATH env var > ./farmd.toml.
//! Sessions never live in the config — the account store owns them; the
//! config only points at the store file and describes the bridge helper.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use fintopio_api::BASE_URL;

/// Root configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Credential bridge helper settings.
#[derive(Debug, Deserialize)]
pub struct BridgeConfig {
    /// Helper command that performs the platform handshake.
    pub command: String,
    /// Arguments placed before the appended phone number.
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_bridge_timeout")]
    pub timeout_secs: u64,
}

/// Remote API settings.
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("accounts.json")
}

fn default_bridge_timeout() -> u64 {
    300
}

fn default_base_url() -> String {
    BASE_URL.to_owned()
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;

        if config.bridge.command.trim().is_empty() {
            return Err(common::Error::Config(
                "bridge.command must not be empty".into(),
            ));
        }
        if config.bridge.timeout_secs == 0 {
            return Err(common::Error::Config(
                "bridge.timeout_secs must be greater than 0".into(),
            ));
        }
        if !config.api.base_url.starts_with("http://") && !config.api.base_url.starts_with("https://")
        {
            return Err(common::Error::Config(format!(
                "api.base_url must start with http:// or https://, got: {}",
                config.api.base_url
            )));
        }

        Ok(config)
    }

    /// Resolve the config file path from the CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&Path>) -> PathBuf {
        if let Some(p) = cli_path {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("farmd.toml")
    }
}
