//! Configuration loading for curatord.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.curator/config.toml` (user)
//! 3. `/etc/curator/config.toml` (system)
//! 4. Built-in defaults
//!
//! Environment variables then override individual settings, which is how
//! container deployments configure the service:
//!
//! | Variable               | Setting                              |
//! |------------------------|--------------------------------------|
//! | `OTEL_SERVICE_NAME`    | `server.service_name`                |
//! | `RECOMMENDATION_PORT`  | `server.address` (binds `0.0.0.0`)   |
//! | `PRODUCT_CATALOG_ADDR` | `catalog.address`                    |
//! | `FLAGD_HOST`           | host of `flags.ofrep_url`            |
//! | `FLAGD_OFREP_PORT`     | port of `flags.ofrep_url`            |

use std::collections::HashMap;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cache::CacheConfig;
use crate::providers::OfrepConfig;
use crate::recommender::DEFAULT_CACHE_FLAG;
use crate::selector::DEFAULT_MAX_RECOMMENDATIONS;
use crate::{CuratorError, Result};

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub flags: FlagsConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub recommendations: RecommendationsConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:9001).
    #[serde(default = "default_address")]
    pub address: String,
    /// Service name reported in logs (default: "recommendation").
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            service_name: default_service_name(),
        }
    }
}

impl ServerConfig {
    /// Parse the bind address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.address.parse().map_err(|e| {
            CuratorError::Configuration(format!("invalid address {:?}: {e}", self.address))
        })
    }
}

fn default_address() -> String {
    "0.0.0.0:9001".to_string()
}

fn default_service_name() -> String {
    "recommendation".to_string()
}

/// Upstream product catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Catalog gRPC address; `host:port` is accepted (default: product-catalog:3550).
    #[serde(default = "default_catalog_address")]
    pub address: String,
    /// Per-call timeout in milliseconds (default: 2000).
    #[serde(default = "default_catalog_timeout")]
    pub timeout_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            address: default_catalog_address(),
            timeout_ms: default_catalog_timeout(),
        }
    }
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_catalog_address() -> String {
    "product-catalog:3550".to_string()
}

fn default_catalog_timeout() -> u64 {
    2_000
}

/// Which flag gate backs the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagProvider {
    /// flagd over OFREP.
    #[default]
    Flagd,
    /// Fixed values from `flags.values`.
    Static,
}

/// Feature flag configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FlagsConfig {
    #[serde(default)]
    pub provider: FlagProvider,
    /// flagd OFREP base URL (default: http://flagd:8016).
    #[serde(default = "default_ofrep_url")]
    pub ofrep_url: String,
    /// Evaluation timeout in milliseconds (default: 500).
    #[serde(default = "default_flag_timeout")]
    pub timeout_ms: u64,
    /// Flag key that enables the product cache.
    #[serde(default = "default_cache_flag")]
    pub cache_flag: String,
    /// Values served by the static provider.
    #[serde(default)]
    pub values: HashMap<String, bool>,
}

impl Default for FlagsConfig {
    fn default() -> Self {
        Self {
            provider: FlagProvider::default(),
            ofrep_url: default_ofrep_url(),
            timeout_ms: default_flag_timeout(),
            cache_flag: default_cache_flag(),
            values: HashMap::new(),
        }
    }
}

impl From<&FlagsConfig> for OfrepConfig {
    fn from(flags: &FlagsConfig) -> Self {
        OfrepConfig::new(flags.ofrep_url.clone()).timeout(Duration::from_millis(flags.timeout_ms))
    }
}

fn default_ofrep_url() -> String {
    crate::providers::flagd::DEFAULT_OFREP_URL.to_string()
}

fn default_flag_timeout() -> u64 {
    500
}

fn default_cache_flag() -> String {
    DEFAULT_CACHE_FLAG.to_string()
}

/// Product cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Maximum cached product ids (default: 10000).
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    /// Per-request refresh probability (default: 0.5).
    #[serde(default = "default_refresh_probability")]
    pub refresh_probability: f64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            refresh_probability: default_refresh_probability(),
        }
    }
}

impl From<&CacheSettings> for CacheConfig {
    fn from(settings: &CacheSettings) -> Self {
        CacheConfig::new()
            .max_entries(settings.max_entries)
            .refresh_probability(settings.refresh_probability)
    }
}

fn default_max_entries() -> usize {
    CacheConfig::default().max_entries
}

fn default_refresh_probability() -> f64 {
    CacheConfig::default().refresh_probability
}

/// Recommendation output settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationsConfig {
    /// Maximum products per response (default: 5).
    #[serde(default = "default_max_responses")]
    pub max_responses: usize,
}

impl Default for RecommendationsConfig {
    fn default() -> Self {
        Self {
            max_responses: default_max_responses(),
        }
    }
}

fn default_max_responses() -> usize {
    DEFAULT_MAX_RECOMMENDATIONS
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided, must exist)
    /// 2. `~/.curator/config.toml`
    /// 3. `/etc/curator/config.toml`
    /// 4. Defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Config::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CuratorError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            CuratorError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path, if any.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(CuratorError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".curator").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/curator/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, keyed by environment variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("OTEL_SERVICE_NAME") {
            self.server.service_name = name;
        }

        if let Some(port) = lookup("RECOMMENDATION_PORT") {
            let port: u16 = port.trim().parse().map_err(|e| {
                CuratorError::Configuration(format!("invalid RECOMMENDATION_PORT {port:?}: {e}"))
            })?;
            self.server.address = format!("0.0.0.0:{port}");
        }

        if let Some(addr) = lookup("PRODUCT_CATALOG_ADDR") {
            self.catalog.address = addr;
        }

        let flagd_host = lookup("FLAGD_HOST");
        let flagd_port = lookup("FLAGD_OFREP_PORT");
        if flagd_host.is_some() || flagd_port.is_some() {
            let host = flagd_host.unwrap_or_else(|| "flagd".to_string());
            let port = flagd_port.unwrap_or_else(|| "8016".to_string());
            self.flags.ofrep_url = format!("http://{host}:{port}");
        }

        Ok(())
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.server.socket_addr()?;
        if self.catalog.address.trim().is_empty() {
            return Err(CuratorError::Configuration(
                "catalog address must not be empty".to_string(),
            ));
        }
        if self.recommendations.max_responses == 0 {
            return Err(CuratorError::Configuration(
                "recommendations.max_responses must be greater than 0".to_string(),
            ));
        }
        CacheConfig::from(&self.cache).validate()
    }
}
