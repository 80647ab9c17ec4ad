use crate::{DEFAULT_PLAYER_NAME, STARTING_CAPITAL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Invalid(e.to_string())
    }
}

/// Names of the static documents a session loads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentNames {
    /// Primary trajectory: owns the date axis and the asset returns.
    pub primary: String,
    /// Secondary trajectory, reconciled onto the primary's months.
    pub secondary: String,
    pub benchmarks: String,
}

impl Default for DocumentNames {
    fn default() -> Self {
        Self {
            primary: "trpo3.json".to_string(),
            secondary: "ppo_trajectory.json".to_string(),
            benchmarks: "benchmarks.json".to_string(),
        }
    }
}

/// Game configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Capital every path is rebased to (> 0).
    pub starting_capital: f64,
    /// Single-asset shadow benchmark ticker, matched case-insensitively.
    pub shadow_ticker: String,
    /// Player name used when none is given.
    pub default_player_name: String,
    pub documents: DocumentNames,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_capital: STARTING_CAPITAL,
            shadow_ticker: "SPY".to_string(),
            default_player_name: DEFAULT_PLAYER_NAME.to_string(),
            documents: DocumentNames::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl GameConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path.as_ref())?;
        let cfg = Self::from_yaml_str(&text)?;
        info!(path = %path.as_ref().display(), "loaded game config");
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.starting_capital.is_finite() && self.starting_capital > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "starting_capital must be finite and > 0, got {}",
                self.starting_capital
            )));
        }
        if self.shadow_ticker.trim().is_empty() {
            return Err(ConfigError::Invalid("shadow_ticker is empty".into()));
        }
        if self.documents.primary.trim().is_empty() {
            return Err(ConfigError::Invalid("documents.primary is empty".into()));
        }
        Ok(())
    }
}
