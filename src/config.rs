//! Configuration management
//!
//! TOML file with `[params]` and `[simulation]` sections, every field
//! optional. A `.env` file and `BANCOR_*` environment variables override
//! individual values after the file is read.
//!
//! Created: 2026-10-17

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::params::Params;
use crate::simulation::SimulationConfig;

pub const ENV_CREATE_BANCOR_FEE: &str = "BANCOR_CREATE_BANCOR_FEE";
pub const ENV_CANCEL_BANCOR_FEE: &str = "BANCOR_CANCEL_BANCOR_FEE";
pub const ENV_TRADE_FEE_RATE: &str = "BANCOR_TRADE_FEE_RATE";
pub const ENV_RESERVE_DENOM: &str = "BANCOR_RESERVE_DENOM";
pub const ENV_SIM_SEED: &str = "BANCOR_SIM_SEED";
pub const ENV_SIM_OPERATIONS: &str = "BANCOR_SIM_OPERATIONS";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BancorConfig {
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl BancorConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .with_context(|| "Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, or the file at `path` when given, then env overrides
    pub fn load_with_env(path: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `lookup` (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        override_parsed(&lookup, ENV_CREATE_BANCOR_FEE, &mut self.params.create_bancor_fee)?;
        override_parsed(&lookup, ENV_CANCEL_BANCOR_FEE, &mut self.params.cancel_bancor_fee)?;
        override_parsed(&lookup, ENV_TRADE_FEE_RATE, &mut self.params.trade_fee_rate)?;
        override_parsed(&lookup, ENV_RESERVE_DENOM, &mut self.params.reserve_denom)?;
        override_parsed(&lookup, ENV_SIM_SEED, &mut self.simulation.seed)?;
        override_parsed(&lookup, ENV_SIM_OPERATIONS, &mut self.simulation.operations)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.params.validate().context("Invalid [params] section")?;
        self.simulation.validate().context("Invalid [simulation] section")?;
        Ok(())
    }
}

fn override_parsed<F, T>(lookup: &F, key: &str, target: &mut T) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if let Some(raw) = lookup(key) {
        *target = raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw))?;
    }
    Ok(())
}
