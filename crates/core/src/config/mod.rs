//! Configuration loading and schema definitions
//!
//! Settings for the search engine, the HTTP catalog source and telemetry,
//! read from `platter.toml`.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
