//! Feature-set presets and builder configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named feature compositions.
///
/// Every preset starts with the same five price columns (today's open and
/// yesterday's close, high, low and pivot) and always carries ATR and RSI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSet {
    /// Price columns + ATR + RSI. Works without volume.
    Minimal,
    /// Price columns + yesterday's volume + ATR + RSI + SMA.
    Standard,
    /// `Standard` + EMA + yesterday's VWAP.
    Extended,
}

impl FeatureSet {
    /// Column names in row order.
    pub fn names(self) -> &'static [&'static str] {
        match self {
            Self::Minimal => &[
                "open",
                "prev_close",
                "prev_high",
                "prev_low",
                "prev_pivot",
                "atr",
                "rsi",
            ],
            Self::Standard => &[
                "open",
                "prev_close",
                "prev_high",
                "prev_low",
                "prev_pivot",
                "prev_volume",
                "atr",
                "rsi",
                "sma",
            ],
            Self::Extended => &[
                "open",
                "prev_close",
                "prev_high",
                "prev_low",
                "prev_pivot",
                "prev_volume",
                "atr",
                "rsi",
                "sma",
                "ema",
                "prev_vwap",
            ],
        }
    }

    pub fn width(self) -> usize {
        self.names().len()
    }

    pub fn requires_volume(self) -> bool {
        !matches!(self, Self::Minimal)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Standard => "standard",
            Self::Extended => "extended",
        }
    }

    /// Parse a preset name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn all() -> &'static [FeatureSet] {
        &[Self::Minimal, Self::Standard, Self::Extended]
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Feature builder parameters. Fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub feature_set: FeatureSet,
    /// Window for ATR and RSI; also the first predictable bar index.
    pub lookback_period: usize,
    /// Window for SMA and EMA.
    pub short_period: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            feature_set: FeatureSet::Standard,
            lookback_period: 14,
            short_period: 5,
        }
    }
}
