//! Configuration loading from TOML.
//!
//! Reads `config.toml` (or the path in `STATSEDGE_CONFIG`) and deserializes
//! into strongly-typed structs. Every section is optional; missing sections
//! fall back to the engine's built-in constants.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;

use crate::strategy::insurance::INSURANCE_CAP;
use crate::strategy::kelly::DEFAULT_KELLY_FRACTION;
use crate::strategy::opportunity::ELITE_EDGE_THRESHOLD;
use crate::strategy::EngineConfig;

/// Default config file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub insurance: InsuranceSection,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineSection {
    #[serde(default = "default_kelly_fraction")]
    pub kelly_fraction: f64,
    #[serde(default = "default_elite_edge_threshold")]
    pub elite_edge_threshold: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InsuranceSection {
    #[serde(default = "default_insurance_cap")]
    pub cap: Decimal,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WalletConfig {
    #[serde(default = "default_state_file")]
    pub state_file: String,
    /// Balance of a user the ledger has never seen.
    #[serde(default)]
    pub opening_balance: Decimal,
}

fn default_kelly_fraction() -> f64 {
    DEFAULT_KELLY_FRACTION
}

fn default_elite_edge_threshold() -> f64 {
    ELITE_EDGE_THRESHOLD
}

fn default_insurance_cap() -> Decimal {
    INSURANCE_CAP
}

fn default_true() -> bool {
    true
}

fn default_port() -> u16 {
    8000
}

fn default_state_file() -> String {
    crate::storage::DEFAULT_BOOK_FILE.to_string()
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            kelly_fraction: default_kelly_fraction(),
            elite_edge_threshold: default_elite_edge_threshold(),
        }
    }
}

impl Default for InsuranceSection {
    fn default() -> Self {
        Self {
            cap: default_insurance_cap(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_port(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            opening_balance: Decimal::ZERO,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Path from `STATSEDGE_CONFIG`, else `config.toml`.
    pub fn path_from_env() -> String {
        std::env::var("STATSEDGE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Engine tunables for [`crate::strategy::ValueEngine`].
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            kelly_fraction: self.engine.kelly_fraction,
            elite_edge_threshold: self.engine.elite_edge_threshold,
            insurance_cap: self.insurance.cap,
        }
    }
}
