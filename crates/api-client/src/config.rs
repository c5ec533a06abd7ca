//! Configuration for the catalog API client
//!
//! Precedence is environment variables, then `[api]` in `platter.toml`,
//! then built-in defaults.

use crate::error::{ApiError, ApiResult};
use platter_core::config::ApiSettings;
use platter_core::retry::{RetryConfig, RetryProfile};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default catalog API for local development
const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

const ENV_API_URL: &str = "PLATTER_API_URL";
const ENV_API_KEY: &str = "PLATTER_API_KEY";
const ENV_ENVIRONMENT: &str = "PLATTER_ENV";
const ENV_TIMEOUT_SECS: &str = "PLATTER_TIMEOUT_SECS";

/// Environment types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    #[default]
    Production,
}

impl Environment {
    /// Parse from `PLATTER_ENV`
    pub fn from_env() -> Self {
        Self::parse(&env::var(ENV_ENVIRONMENT).unwrap_or_default())
    }

    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "development" | "dev" | "local" => Self::Development,
            "staging" | "stage" => Self::Staging,
            _ => Self::Production,
        }
    }

    /// Retry policy used when none is configured
    pub fn default_retry(self) -> RetryConfig {
        match self {
            Self::Development => RetryConfig::quick(),
            Self::Staging => RetryConfig::default(),
            Self::Production => RetryConfig::patient(),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the catalog API
    pub base_url: String,
    /// Key sent as `apikey` and as a bearer token
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
    /// Current environment
    pub environment: Environment,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
            retry: RetryConfig::default(),
            environment: Environment::default(),
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `PLATTER_API_URL`: base URL of the catalog API
    /// - `PLATTER_API_KEY`: API key (optional)
    /// - `PLATTER_ENV`: environment (development/staging/production)
    /// - `PLATTER_TIMEOUT_SECS`: request timeout in seconds
    pub fn from_env() -> ApiResult<Self> {
        Self::from_settings(&ApiSettings::default())
    }

    /// Create configuration from `[api]` settings, with environment overrides
    pub fn from_settings(settings: &ApiSettings) -> ApiResult<Self> {
        let environment = Environment::from_env();

        let base_url = env::var(ENV_API_URL)
            .ok()
            .or_else(|| settings.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let api_key = env::var(ENV_API_KEY).ok().filter(|key| !key.is_empty());

        let timeout = match env::var(ENV_TIMEOUT_SECS) {
            Ok(raw) => raw.parse().map(Duration::from_secs).map_err(|_| {
                ApiError::config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds"))
            })?,
            Err(_) => Duration::from_secs(settings.timeout_secs),
        };

        let retry = settings
            .retry
            .map_or_else(|| environment.default_retry(), RetryProfile::to_config);

        Ok(Self {
            base_url,
            api_key,
            timeout,
            retry,
            environment,
        })
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set retry config
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::config("base_url must start with http:// or https://"));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if self.retry.max_attempts == 0 {
            return Err(ApiError::config("retry.max_attempts must be at least 1"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("dev"), Environment::Development);
        assert_eq!(Environment::parse("STAGING"), Environment::Staging);
        assert_eq!(Environment::parse(""), Environment::Production);
        assert_eq!(Environment::Development.default_retry(), RetryConfig::quick());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::default()
            .with_base_url("https://catalog.example.com/v1")
            .with_api_key("secret")
            .with_timeout(Duration::from_secs(3));

        assert_eq!(config.base_url, "https://catalog.example.com/v1");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = ClientConfig::default().with_api_key("secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::default().validate().is_ok());
        assert!(ClientConfig::default().with_base_url("").validate().is_err());
        assert!(ClientConfig::default().with_base_url("ftp://x").validate().is_err());
        assert!(ClientConfig::default().with_timeout(Duration::ZERO).validate().is_err());

        let no_attempts = RetryConfig {
            max_attempts: 0,
            ..RetryConfig::default()
        };
        assert!(ClientConfig::default().with_retry(no_attempts).validate().is_err());
    }
}
