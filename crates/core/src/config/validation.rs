//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `api_base_url` is not an http(s) URL
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `max_results` or `max_requests_per_minute` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_base_url.starts_with("https://") || self.api_base_url.starts_with("http://")) {
            return Err(ConfigError::Invalid {
                field: "api_base_url".into(),
                reason: "must be an http or https URL".into(),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.max_results == 0 {
            return Err(ConfigError::Invalid { field: "max_results".into(), reason: "must be at least 1".into() });
        }

        if self.max_requests_per_minute == 0 {
            return Err(ConfigError::Invalid {
                field: "max_requests_per_minute".into(),
                reason: "must be at least 1".into(),
            });
        }

        if self.min_request_interval_ms.saturating_mul(self.max_requests_per_minute as u64) > 60_000 {
            tracing::warn!(
                min_request_interval_ms = self.min_request_interval_ms,
                max_requests_per_minute = self.max_requests_per_minute,
                "request spacing alone keeps the per-minute limit from being reached"
            );
        }

        Ok(())
    }
}
