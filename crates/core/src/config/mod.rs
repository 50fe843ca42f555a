//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SVGL_*)
//! 2. TOML config file (if SVGL_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cache::CacheLifetime;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SVGL_*)
/// 2. TOML config file (if SVGL_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the icon search API.
    ///
    /// Set via SVGL_API_BASE_URL environment variable.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Directory holding the derived SVG files.
    ///
    /// Set via SVGL_CACHE_DIR environment variable.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via SVGL_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via SVGL_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Quiet period before a typed query is sent. 0 disables debouncing.
    ///
    /// Set via SVGL_DEBOUNCE_INTERVAL_MS environment variable.
    #[serde(default = "default_debounce_interval_ms")]
    pub debounce_interval_ms: u64,

    /// Lifetime of cached search results in minutes. 0 or less never expires.
    ///
    /// Set via SVGL_CACHE_LIFETIME_MINUTES environment variable.
    #[serde(default = "default_cache_lifetime_minutes")]
    pub cache_lifetime_minutes: i64,

    /// Lifetime of files in the asset cache in minutes. 0 or less never expires.
    ///
    /// Set via SVGL_ASSET_LIFETIME_MINUTES environment variable.
    #[serde(default = "default_asset_lifetime_minutes")]
    pub asset_lifetime_minutes: i64,

    /// Maximum number of icons per query (each icon yields two entries).
    ///
    /// Set via SVGL_MAX_RESULTS environment variable.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Whether dark icons get a black background injected.
    ///
    /// Set via SVGL_ADD_DARK_BACKGROUND environment variable.
    #[serde(default = "default_true")]
    pub add_dark_background: bool,

    /// Minimum spacing between two search calls in milliseconds.
    ///
    /// Set via SVGL_MIN_REQUEST_INTERVAL_MS environment variable.
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Maximum number of search calls in any trailing minute.
    ///
    /// Set via SVGL_MAX_REQUESTS_PER_MINUTE environment variable.
    #[serde(default = "default_max_requests_per_minute")]
    pub max_requests_per_minute: usize,
}

fn default_api_base_url() -> String {
    "https://api.svgl.app".into()
}

fn default_cache_dir() -> PathBuf {
    std::env::temp_dir().join("svgl").join("svgl_cache")
}

fn default_user_agent() -> String {
    "svgl-mcp/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_debounce_interval_ms() -> u64 {
    500
}

fn default_cache_lifetime_minutes() -> i64 {
    30
}

fn default_asset_lifetime_minutes() -> i64 {
    7 * 24 * 60
}

fn default_max_results() -> usize {
    10
}

fn default_true() -> bool {
    true
}

fn default_min_request_interval_ms() -> u64 {
    250
}

fn default_max_requests_per_minute() -> usize {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            cache_dir: default_cache_dir(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            debounce_interval_ms: default_debounce_interval_ms(),
            cache_lifetime_minutes: default_cache_lifetime_minutes(),
            asset_lifetime_minutes: default_asset_lifetime_minutes(),
            max_results: default_max_results(),
            add_dark_background: true,
            min_request_interval_ms: default_min_request_interval_ms(),
            max_requests_per_minute: default_max_requests_per_minute(),
        }
    }
}

/// The subset of configuration the query pipeline consumes per query.
///
/// Unlike the rest of `AppConfig` these values may change while the process
/// runs (the host's settings panel owns them).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub debounce_interval: Duration,
    pub cache_lifetime: CacheLifetime,
    pub asset_lifetime: CacheLifetime,
    pub max_results: usize,
    pub add_dark_background: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        AppConfig::default().search_settings()
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Minimum spacing between search calls.
    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }

    /// Project the runtime-changeable search settings.
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            debounce_interval: Duration::from_millis(self.debounce_interval_ms),
            cache_lifetime: CacheLifetime::from_minutes(self.cache_lifetime_minutes),
            asset_lifetime: CacheLifetime::from_minutes(self.asset_lifetime_minutes),
            max_results: self.max_results.max(1),
            add_dark_background: self.add_dark_background,
        }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SVGL_`
    /// 2. TOML file from `SVGL_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SVGL_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SVGL_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
