//! Subcommand implementations

pub mod facets;
pub mod live;
pub mod search;
