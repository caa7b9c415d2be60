//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. Every
//! section is optional; missing fields fall back to the built-in
//! thresholds.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use crate::strategy::performers::PerformersConfig;
use crate::strategy::underdog::UnderdogConfig;
use crate::strategy::young_players::YoungPlayersConfig;
use crate::strategy::StrategyKind;
use crate::types::StrategyError;

/// Default configuration file path.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Top-level strategies configuration.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StrategiesConfig {
    /// Strategy names to register, in evaluation order.
    pub enabled: Vec<String>,
    pub performers: PerformersConfig,
    pub underdog: UnderdogConfig,
    pub young_players: YoungPlayersConfig,
}

impl Default for StrategiesConfig {
    fn default() -> Self {
        Self {
            enabled: StrategyKind::ALL
                .iter()
                .map(|k| k.name().to_string())
                .collect(),
            performers: PerformersConfig::default(),
            underdog: UnderdogConfig::default(),
            young_players: YoungPlayersConfig::default(),
        }
    }
}

impl StrategiesConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: StrategiesConfig = toml::from_str(contents)?;
        config.enabled_kinds()?;
        Ok(config)
    }

    /// Resolve the enabled strategy names.
    pub fn enabled_kinds(&self) -> Result<Vec<StrategyKind>, StrategyError> {
        self.enabled.iter().map(|name| name.parse()).collect()
    }
}
