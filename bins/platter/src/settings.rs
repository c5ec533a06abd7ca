//! Resolved runtime settings.

use platter_core::config::{ApiSettings, Config, WeightOverrides};
use platter_search::{EngineConfig, FieldWeights};
use platter_telemetry::TelemetryConfig;
use std::path::{Path, PathBuf};

/// Everything the commands need, resolved from `platter.toml` and flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub engine: EngineConfig,
    pub api: ApiSettings,
    pub telemetry: TelemetryConfig,
    pub config_path: Option<PathBuf>,
}

impl Settings {
    pub fn load(path: Option<&Path>, verbose: bool) -> platter_core::Result<Self> {
        Ok(Self::from_config(Config::load(path)?, verbose))
    }

    pub(crate) fn from_config(config: Config, verbose: bool) -> Self {
        let schema = config.schema;

        let engine = EngineConfig::default()
            .with_debounce(schema.search.debounce())
            .with_fetch_timeout(schema.search.fetch_timeout())
            .with_weights(field_weights(&schema.search.weights))
            .with_max_results(schema.search.max_results);

        let mut telemetry = TelemetryConfig {
            log_level: schema.telemetry.log_level,
            json: schema.telemetry.json,
            ..TelemetryConfig::default()
        };
        if verbose {
            telemetry = telemetry.verbose();
        }

        Self {
            engine,
            api: schema.api,
            telemetry,
            config_path: config.path,
        }
    }
}

/// Apply configured overrides on top of the default weights.
fn field_weights(overrides: &WeightOverrides) -> FieldWeights {
    let defaults = FieldWeights::default();
    FieldWeights {
        name: overrides.name.unwrap_or(defaults.name),
        restaurant: overrides.restaurant.unwrap_or(defaults.restaurant),
        category: overrides.category.unwrap_or(defaults.category),
        any: overrides.any.unwrap_or(defaults.any),
        token_bonus: overrides.token_bonus.unwrap_or(defaults.token_bonus),
    }
}
