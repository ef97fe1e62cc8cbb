//! Serializable prediction configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! [features]
//! feature_set = "standard"
//! lookback_period = 14
//! short_period = 5
//!
//! [model]
//! ridge = 1e-6
//! fit_intercept = true
//! ```
//!
//! Missing tables and keys fall back to [`PredictorConfig::default`].

use std::path::Path;

use closecast_core::fingerprint::config_hash;
use closecast_core::{FeatureConfig, LinearRegression};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything needed to reproduce one prediction from a bar sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub features: FeatureConfig,
    pub model: LinearRegression,
}

impl PredictorConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check parameter ranges.
    ///
    /// `short_period <= lookback_period` guarantees that at every predictable
    /// bar the SMA/EMA windows are full, so their insufficient-history fallback
    /// (today's close) can never leak the label into a feature.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.features;
        if f.lookback_period < 1 {
            return Err(ConfigError::Invalid("lookback_period must be >= 1".into()));
        }
        if f.short_period < 1 {
            return Err(ConfigError::Invalid("short_period must be >= 1".into()));
        }
        if f.short_period > f.lookback_period {
            return Err(ConfigError::Invalid(format!(
                "short_period ({}) must not exceed lookback_period ({})",
                f.short_period, f.lookback_period
            )));
        }
        if !self.model.ridge.is_finite() || self.model.ridge < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "ridge must be finite and >= 0, got {}",
                self.model.ridge
            )));
        }
        Ok(())
    }

    /// Minimum bar count for one training row plus an evaluation day.
    pub fn min_bars(&self) -> usize {
        self.features.lookback_period + 2
    }

    /// Deterministic hash of this configuration.
    pub fn config_hash(&self) -> Result<String, serde_json::Error> {
        config_hash(self)
    }
}
