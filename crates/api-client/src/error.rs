//! Error types for the API client

use platter_core::{Error as CoreError, ErrorCode};
use std::time::Duration;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// Circuit breaker is open
    #[error("Circuit breaker is open - service temporarily unavailable")]
    CircuitOpen,

    /// Request timeout
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// All retry attempts exhausted
    #[error("All {attempts} retry attempts failed: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Last error message
        last_error: String,
    },
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            Self::ApiResponse { status, .. } => *status >= 500 || *status == 429,
            Self::Timeout(_) => true,
            Self::CircuitOpen
            | Self::Config(_)
            | Self::Json(_)
            | Self::RetriesExhausted { .. } => false,
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if *status >= 500)
    }
}

impl From<ApiError> for CoreError {
    fn from(err: ApiError) -> Self {
        let code = match &err {
            ApiError::Config(_) => ErrorCode::InvalidConfigValue,
            ApiError::CircuitOpen => ErrorCode::CircuitOpen,
            ApiError::Timeout(_) => ErrorCode::Timeout,
            ApiError::Json(_) => ErrorCode::InvalidFormat,
            _ => ErrorCode::SourceUnavailable,
        };
        let message = err.to_string();
        let core = CoreError::new(code, message);
        match code {
            ErrorCode::InvalidConfigValue => core
                .with_suggestion("Check [api] in platter.toml and the PLATTER_* environment variables"),
            ErrorCode::SourceUnavailable | ErrorCode::Timeout => core
                .with_suggestion("Check PLATTER_API_URL or pass --catalog to search a local file"),
            _ => core,
        }
        .with_source(err)
    }
}
