//! Prediction report — the structured result of one run.

use std::fmt;

use chrono::NaiveDate;
use closecast_core::FeatureSet;
use serde::{Deserialize, Serialize};

/// Current schema version for serialized reports.
pub const SCHEMA_VERSION: u32 = 1;

/// Outcome of one scale → fit → predict → inverse-scale run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    // ── Prediction ──
    pub predicted_close: f64,
    /// The evaluation day's recorded close.
    pub actual_close: f64,
    /// `predicted_close - actual_close`
    pub deviation: f64,
    /// `deviation / actual_close * 100`
    pub deviation_pct: f64,

    // ── Inputs ──
    pub evaluation_date: NaiveDate,
    /// The bar whose values fill the lagged columns of the prediction row.
    pub lagged_date: NaiveDate,
    /// Open used in the prediction row.
    pub open_used: f64,
    /// True when `open_used` came from the caller rather than the bar.
    pub open_overridden: bool,

    // ── Model ──
    pub feature_set: FeatureSet,
    pub feature_names: Vec<String>,
    pub training_rows: usize,
    /// In-sample R² on the scaled training data.
    pub r_squared: f64,

    // ── Provenance ──
    pub dataset_hash: String,
    pub config_hash: String,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl PredictionReport {
    /// Signed deviation and percentage deviation of `predicted` from `actual`.
    pub fn deviation_of(predicted: f64, actual: f64) -> (f64, f64) {
        let deviation = predicted - actual;
        (deviation, deviation / actual * 100.0)
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for PredictionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open_note = if self.open_overridden { " (override)" } else { "" };
        writeln!(f, "Evaluation day:   {}", self.evaluation_date)?;
        writeln!(f, "Open used:        {:.4}{open_note}", self.open_used)?;
        writeln!(f, "Predicted close:  {:.4}", self.predicted_close)?;
        writeln!(f, "Actual close:     {:.4}", self.actual_close)?;
        writeln!(
            f,
            "Deviation:        {:+.4} ({:+.2}%)",
            self.deviation, self.deviation_pct
        )?;
        write!(
            f,
            "Model:            {} features, {} training rows, R² {:.4}",
            self.feature_set, self.training_rows, self.r_squared
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PredictionReport {
        let (deviation, deviation_pct) = PredictionReport::deviation_of(101.0, 100.0);
        PredictionReport {
            schema_version: SCHEMA_VERSION,
            predicted_close: 101.0,
            actual_close: 100.0,
            deviation,
            deviation_pct,
            evaluation_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            lagged_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            open_used: 99.5,
            open_overridden: true,
            feature_set: FeatureSet::Minimal,
            feature_names: FeatureSet::Minimal.names().iter().map(|s| s.to_string()).collect(),
            training_rows: 30,
            r_squared: 0.97,
            dataset_hash: "abc".into(),
            config_hash: "def".into(),
        }
    }

    #[test]
    fn deviation_is_signed_percentage() {
        let (d, pct) = PredictionReport::deviation_of(95.0, 100.0);
        assert_eq!(d, -5.0);
        assert_eq!(pct, -5.0);
        let (d, pct) = PredictionReport::deviation_of(101.0, 100.0);
        assert_eq!(d, 1.0);
        assert!((pct - 1.0).abs() < 1e-12);
    }

    #[test]
    fn json_roundtrip() {
        let report = sample();
        let json = report.to_json().unwrap();
        assert!(json.contains("\"feature_set\": \"minimal\""));
        let back: PredictionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn json_keeps_every_float_bit() {
        let report = PredictionReport {
            r_squared: 0.999_999_999_969_821_9,
            predicted_close: 101.000_000_000_000_01,
            deviation_pct: 1.0 / 3.0,
            ..sample()
        };
        let back: PredictionReport = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(back.r_squared.to_bits(), report.r_squared.to_bits());
        assert_eq!(back, report);
    }

    #[test]
    fn missing_schema_version_defaults() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value.as_object_mut().unwrap().remove("schema_version");
        let back: PredictionReport = serde_json::from_value(value).unwrap();
        assert_eq!(back.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn display_mentions_override() {
        let text = sample().to_string();
        assert!(text.contains("Predicted close:  101.0000"));
        assert!(text.contains("(override)"));
        assert!(text.contains("+1.00%"));
    }
}
