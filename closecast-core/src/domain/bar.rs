//! Bar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLC(V) bar for a single symbol.
///
/// Bars are immutable once read and always handled as a slice ordered
/// oldest → newest, so index 0 is the earliest day. Volume is optional:
/// feature sets that need it reject bars without it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl Bar {
    /// Pivot point: (high + low + close) / 3.
    pub fn pivot(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Typical price used by VWAP. Same formula as the pivot point.
    pub fn typical_price(&self) -> f64 {
        self.pivot()
    }

    /// Returns true if any OHLC field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic sanity check: high >= low, high/low bracket open and close,
    /// positive prices, non-negative finite volume when present.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        let volume_ok = self.volume.map_or(true, |v| v.is_finite() && v >= 0.0);
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
            && volume_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: Some(50_000.0),
        }
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn bar_detects_void() {
        let mut bar = sample_bar();
        bar.open = f64::NAN;
        assert!(bar.is_void());
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar();
        bar.high = 97.0; // below low
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_rejects_negative_volume() {
        let mut bar = sample_bar();
        bar.volume = Some(-1.0);
        assert!(!bar.is_sane());
        bar.volume = None;
        assert!(bar.is_sane());
    }

    #[test]
    fn pivot_is_mean_of_high_low_close() {
        let bar = sample_bar();
        assert_eq!(bar.pivot(), (105.0 + 98.0 + 103.0) / 3.0);
        assert_eq!(bar.typical_price(), bar.pivot());
    }

    #[test]
    fn bar_deserializes_without_volume() {
        let json = r#"{"date":"2024-01-02","open":1.0,"high":2.0,"low":0.5,"close":1.5}"#;
        let bar: Bar = serde_json::from_str(json).unwrap();
        assert_eq!(bar.volume, None);
        assert_eq!(bar.close, 1.5);
    }
}
