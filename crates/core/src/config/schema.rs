//! Configuration schema definitions

use crate::error::{Error, Result};
use crate::retry::RetryProfile;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    /// `[search]`
    #[serde(default)]
    pub search: SearchSettings,

    /// `[api]`
    #[serde(default)]
    pub api: ApiSettings,

    /// `[telemetry]`
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl ConfigSchema {
    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        self.api.validate()
    }
}

/// Search engine settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchSettings {
    /// Quiet period after the last keystroke before fetching
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Per-source fetch timeout; `0` disables it
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Cap on published results
    #[serde(default)]
    pub max_results: Option<usize>,

    /// Scoring weight overrides
    #[serde(default)]
    pub weights: WeightOverrides,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            max_results: None,
            weights: WeightOverrides::default(),
        }
    }
}

impl SearchSettings {
    /// Debounce as a duration
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Fetch timeout, `None` when disabled
    pub fn fetch_timeout(&self) -> Option<Duration> {
        (self.fetch_timeout_secs > 0).then(|| Duration::from_secs(self.fetch_timeout_secs))
    }

    fn validate(&self) -> Result<()> {
        if self.debounce_ms > 10_000 {
            return Err(Error::invalid_config_value(
                "search.debounce_ms",
                "must be at most 10000",
            ));
        }
        if self.max_results == Some(0) {
            return Err(Error::invalid_config_value(
                "search.max_results",
                "must be greater than zero",
            ));
        }
        self.weights.validate()
    }
}

fn default_debounce_ms() -> u64 {
    200
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

/// Per-field scoring weights; unset fields keep the engine defaults
#[allow(missing_docs)]
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WeightOverrides {
    #[serde(default)]
    pub name: Option<f64>,
    #[serde(default)]
    pub restaurant: Option<f64>,
    #[serde(default)]
    pub category: Option<f64>,
    #[serde(default)]
    pub any: Option<f64>,
    #[serde(default)]
    pub token_bonus: Option<f64>,
}

impl WeightOverrides {
    fn validate(&self) -> Result<()> {
        let fields = [
            ("name", self.name),
            ("restaurant", self.restaurant),
            ("category", self.category),
            ("any", self.any),
            ("token_bonus", self.token_bonus),
        ];
        for (key, value) in fields {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(Error::invalid_config_value(
                        &format!("search.weights.{key}"),
                        "must be a non-negative number",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// HTTP catalog source settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSettings {
    /// Base URL of the catalog API; `PLATTER_API_URL` wins when set
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_api_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry policy for transient failures; unset picks one per `PLATTER_ENV`
    #[serde(default)]
    pub retry: Option<RetryProfile>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_api_timeout_secs(),
            retry: None,
        }
    }
}

impl ApiSettings {
    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::invalid_config_value("api.timeout_secs", "cannot be zero"));
        }
        if let Some(url) = &self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(Error::invalid_config_value(
                    "api.base_url",
                    "must start with http:// or https://",
                ));
            }
        }
        Ok(())
    }
}

fn default_api_timeout_secs() -> u64 {
    10
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TelemetrySettings {
    /// `tracing` filter directive, e.g. `info` or `platter_search=debug`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines instead of the compact format
    #[serde(default)]
    pub json: bool,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
