//! Core utilities shared by the Platter crates
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based `platter.toml` loading with validation
//! - **Retry**: backoff policies and a circuit breaker for remote sources
//!
//! # Example
//!
//! ```rust,no_run
//! use platter_core::config::Config;
//!
//! let config = Config::load(None).expect("invalid platter.toml");
//! println!("debounce: {:?}", config.schema.search.debounce());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod retry;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::retry::{CircuitBreaker, CircuitBreakerConfig, RetryConfig, RetryProfile};
}
