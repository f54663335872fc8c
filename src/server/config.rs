//! Configuration loading for drydockd.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag; must exist)
//! 2. `~/.drydock/config.toml` (user)
//! 3. `/etc/drydock/config.toml` (system)
//!
//! When no file is found the built-in defaults are used.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::cache::{CacheConfig, default_cache_dir};
use crate::upstream::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT, UpstreamConfig};
use crate::{DrydockError, Result};

const CONFIG_FILE: &str = "config.toml";

/// Daemon configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamSection,
    #[serde(default)]
    pub cache: CacheSection,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3001).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:3001".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// Cache directory (default: `~/.cache/drydock`).
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
    /// Record lifetime in seconds (default: 86400).
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            ttl_secs: default_ttl(),
        }
    }
}

fn default_ttl() -> u64 {
    24 * 60 * 60
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.drydock/config.toml`
    /// 3. `/etc/drydock/config.toml`
    /// 4. Built-in defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => {
                info!(path = %path.display(), "loading config");
                Self::load_from_file(&path)
            }
            None => {
                info!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DrydockError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            DrydockError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// The explicit path if given (it must exist), else the first existing
    /// standard location.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        match explicit {
            Some(path) if path.exists() => Ok(Some(path.to_path_buf())),
            Some(path) => Err(DrydockError::Configuration(format!(
                "Config file not found: {path:?}"
            ))),
            None => Ok(standard_locations().into_iter().find(|p| p.exists())),
        }
    }

    pub fn upstream_config(&self) -> UpstreamConfig {
        UpstreamConfig::new(&self.upstream.base_url)
            .timeout(Duration::from_secs(self.upstream.timeout_secs))
            .user_agent(&self.upstream.user_agent)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new(&self.cache.dir).ttl(Duration::from_secs(self.cache.ttl_secs))
    }
}

/// `~/.drydock/config.toml` then `/etc/drydock/config.toml`.
fn standard_locations() -> Vec<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".drydock").join(CONFIG_FILE))
        .into_iter()
        .chain([Path::new("/etc/drydock").join(CONFIG_FILE)])
        .collect()
}
