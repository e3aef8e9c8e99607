//! Layered configuration for a simulation run.
//!
//! Sources, lowest precedence first: the variant preset, an optional TOML
//! file, `FLY_*` environment variables, then explicit CLI overrides.

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use fly_core::config::SimulationConfig;
use fly_core::types::Variant;

/// Prefix of environment overrides, e.g. `FLY_INITIAL_SUPPLY=1000`.
pub const ENV_PREFIX: &str = "FLY";

/// CLI values that win over every other source.
#[derive(Debug, Default, Clone, Copy)]
pub struct Overrides {
    pub seed: Option<u64>,
    pub months: Option<u32>,
}

/// Resolve and validate the configuration for `variant`.
pub fn load(variant: Variant, path: Option<&Path>, overrides: Overrides) -> Result<SimulationConfig> {
    load_with_env(variant, path, overrides, Environment::with_prefix(ENV_PREFIX))
}

fn load_with_env(
    variant: Variant,
    path: Option<&Path>,
    overrides: Overrides,
    env: Environment,
) -> Result<SimulationConfig> {
    let preset = SimulationConfig::preset(variant);
    let mut builder = Config::builder()
        .add_source(Config::try_from(&preset).context("failed to encode preset")?);

    if let Some(path) = path {
        if !path.exists() {
            anyhow::bail!("configuration file {} not found (specified via --config)", path.display());
        }
        builder = builder.add_source(File::from(path));
    }

    builder = builder.add_source(env.try_parsing(true));

    let mut config: SimulationConfig = builder
        .build()
        .context("failed to read configuration")?
        .try_deserialize()
        .context("invalid configuration")?;

    // The preset was chosen on the command line; a `variant` key cannot relabel it.
    config.variant = variant;
    if let Some(seed) = overrides.seed {
        config.seed = seed;
    }
    if let Some(months) = overrides.months {
        config.period_months = months;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Resolved configuration rendered as TOML.
pub fn render(config: &SimulationConfig) -> Result<String> {
    toml::to_string_pretty(config).context("failed to render configuration")
}
