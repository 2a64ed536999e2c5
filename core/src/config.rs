//! Configuration management
//!
//! YAML configuration discovered in the working directory first, then
//! the user config directory. Every field has a default, so the client
//! runs with no file at all. `SOCKCHAT_URL` overrides the server URL.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config file name searched for in the standard locations.
const CONFIG_FILE: &str = "sockchat.yml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yml::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Chat server endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Websocket endpoint the client connects to.
    #[serde(default = "default_url")]
    pub url: String,
    /// Bind address for `sockchat serve`.
    #[serde(default = "default_listen")]
    pub listen: String,
}

/// Front-end preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Honor the legacy `/` notice marker in peer-sent messages.
    #[serde(default = "default_true")]
    pub legacy_notices: bool,
}

fn default_url() -> String {
    "ws://127.0.0.1:12345/ws".to_string()
}

fn default_listen() -> String {
    "127.0.0.1:12345".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            listen: default_listen(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            legacy_notices: true,
        }
    }
}

impl Config {
    /// Load from the first config file found, falling back to defaults,
    /// then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match find_config_file() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        if let Ok(url) = std::env::var("SOCKCHAT_URL") {
            if !url.is_empty() {
                config.server.url = url;
            }
        }
        Ok(config)
    }

    /// Load from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Find the configuration file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join(CONFIG_FILE);
        if path.exists() {
            return Some(path);
        }
    }

    if let Some(dir) = get_config_dir() {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            return Some(path);
        }
    }

    None
}

/// Get the configuration directory path.
pub fn get_config_dir() -> Option<PathBuf> {
    use dirs::config_dir;
    use home::home_dir;

    if let Some(dir) = config_dir() {
        return Some(dir.join("sockchat"));
    }

    if let Some(home) = home_dir() {
        return Some(home.join(".config").join("sockchat"));
    }

    None
}
