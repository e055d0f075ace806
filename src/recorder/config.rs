//! Recorder configuration
//!
//! Defaults reproduce the local development setup: a collector on
//! `127.0.0.1:5000` and a ten second flush interval.

use crate::capture::input::types::CoordinatePolicy;
use crate::recorder::error::{RecorderError, RecorderResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/collect";
pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 10_000;

pub const ENV_ENDPOINT: &str = "INTERACTION_RECORDER_ENDPOINT";
pub const ENV_FLUSH_INTERVAL_MS: &str = "INTERACTION_RECORDER_FLUSH_INTERVAL_MS";
pub const ENV_COORDINATES: &str = "INTERACTION_RECORDER_COORDINATES";
/// Page address reported by the headless feed host
pub const ENV_PAGE_URL: &str = "INTERACTION_RECORDER_PAGE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecorderConfig {
    /// Collector URL batches are POSTed to
    pub endpoint: String,
    /// Time between flushes in milliseconds
    pub flush_interval_ms: u64,
    pub coordinate_policy: CoordinatePolicy,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
            coordinate_policy: CoordinatePolicy::default(),
        }
    }
}

impl RecorderConfig {
    /// Defaults overlaid with the `INTERACTION_RECORDER_*` environment variables.
    pub fn from_env() -> RecorderResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> RecorderResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            config.endpoint = endpoint.trim().to_string();
        }

        if let Some(interval) = lookup(ENV_FLUSH_INTERVAL_MS) {
            config.flush_interval_ms = interval.trim().parse().map_err(|e| {
                RecorderError::Configuration(format!(
                    "{} must be a whole number of milliseconds: {}",
                    ENV_FLUSH_INTERVAL_MS, e
                ))
            })?;
        }

        if let Some(policy) = lookup(ENV_COORDINATES) {
            config.coordinate_policy = policy
                .parse()
                .map_err(|e| RecorderError::Configuration(format!("{}: {}", ENV_COORDINATES, e)))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RecorderResult<()> {
        let url = reqwest::Url::parse(&self.endpoint).map_err(|e| {
            RecorderError::Configuration(format!("Invalid endpoint '{}': {}", self.endpoint, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(RecorderError::Configuration(format!(
                "Endpoint must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.flush_interval_ms == 0 {
            return Err(RecorderError::Configuration(
                "Flush interval must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }
}
