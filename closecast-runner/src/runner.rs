//! Strategy runner — wires features, scaling, regression and reporting.
//!
//! One call is one deterministic pass:
//! 1. Validate the config and that there are `lookback + 2` bars
//! 2. Split: the last bar is the evaluation day, everything before it trains
//! 3. Build training features; fail if none
//! 4. Fit one scaler over X and one over the label column
//! 5. Scale the training data and fit the regressor
//! 6. Build the evaluation day's row (override open or its recorded open)
//! 7. Scale it with the *training* scaler, predict, inverse-scale the output
//! 8. Report predicted vs actual close
//!
//! Nothing is retried or refit; scalers and model live for this call only.

use closecast_core::features::{self, FeatureError};
use closecast_core::fingerprint::dataset_hash;
use closecast_core::{
    Bar, LinearRegression, MinMaxScaler, ModelError, Regressor, ScaleError, TrainedModel,
};
use thiserror::Error;

use crate::config::{ConfigError, PredictorConfig};
use crate::report::{PredictionReport, SCHEMA_VERSION};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("insufficient data: need at least {required} bars, have {available}")]
    InsufficientData { required: usize, available: usize },
    #[error("feature error: {0}")]
    Feature(#[from] FeatureError),
    #[error("scaling error: {0}")]
    Scale(#[from] ScaleError),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
    #[error("invalid override open {0}: must be finite and positive")]
    InvalidOpen(f64),
    #[error("fingerprint error: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

/// Runs the prediction pipeline with an injected regressor.
#[derive(Debug, Clone)]
pub struct StrategyRunner<R: Regressor = LinearRegression> {
    config: PredictorConfig,
    regressor: R,
}

impl StrategyRunner<LinearRegression> {
    /// Runner using the config's own linear-regression settings.
    pub fn new(config: PredictorConfig) -> Self {
        let regressor = config.model.clone();
        Self { config, regressor }
    }
}

impl<R: Regressor> StrategyRunner<R> {
    /// Runner with a caller-supplied regressor. `config.model` is then only
    /// recorded in the config hash.
    pub fn with_regressor(config: PredictorConfig, regressor: R) -> Self {
        Self { config, regressor }
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Predict the last bar's close from everything before it.
    ///
    /// `override_open` replaces the evaluation day's open in the prediction
    /// row (live what-if); `None` uses the recorded open (backtest).
    pub fn run(
        &self,
        bars: &[Bar],
        override_open: Option<f64>,
    ) -> Result<PredictionReport, RunError> {
        // 1. Validate
        self.config.validate()?;
        let required = self.config.min_bars();
        if bars.len() < required {
            tracing::warn!(required, available = bars.len(), "not enough bars to predict");
            return Err(RunError::InsufficientData {
                required,
                available: bars.len(),
            });
        }
        if let Some(open) = override_open {
            if !open.is_finite() || open <= 0.0 {
                return Err(RunError::InvalidOpen(open));
            }
        }

        // 2. Split
        let last = bars.len() - 1;
        let evaluation_day = &bars[last];
        let lagged_day = &bars[last - 1];
        let training_set = &bars[..last];

        // 3. Training features
        let feature_config = &self.config.features;
        let training = features::build(training_set, feature_config)?;
        if training.is_empty() {
            return Err(RunError::InsufficientData {
                required,
                available: bars.len(),
            });
        }

        // 4. Scalers
        let x_scaler = MinMaxScaler::fit(&training.rows)?;
        let y_scaler = MinMaxScaler::fit(&training.labels)?;

        // 5. Scale + fit
        let x_scaled = x_scaler.scale_all(&training.rows)?;
        let y_scaled = y_scaler.scale_all(&training.labels)?;
        let model = self.regressor.fit(&x_scaled, &y_scaled)?;

        // 6. Prediction row
        let open_used = override_open.unwrap_or(evaluation_day.open);
        let row = features::feature_row(bars, last, feature_config, open_used)?;

        // 7. Scale with the training scaler, predict, invert
        let row_scaled = x_scaler.scale(&row)?;
        let predicted_scaled = single_output(&model.predict(&row_scaled)?)?;
        let predicted_close = single_output(&y_scaler.inverse_scale(&[predicted_scaled])?)?;

        // 8. Report
        let actual_close = evaluation_day.close;
        let (deviation, deviation_pct) =
            PredictionReport::deviation_of(predicted_close, actual_close);
        let r_squared = in_sample_r_squared(&model, &x_scaled, &y_scaled)?;

        tracing::info!(
            date = %evaluation_day.date,
            predicted_close,
            actual_close,
            deviation_pct,
            training_rows = training.len(),
            "prediction complete"
        );

        let feature_set = feature_config.feature_set;
        Ok(PredictionReport {
            schema_version: SCHEMA_VERSION,
            predicted_close,
            actual_close,
            deviation,
            deviation_pct,
            evaluation_date: evaluation_day.date,
            lagged_date: lagged_day.date,
            open_used,
            open_overridden: override_open.is_some(),
            feature_set,
            feature_names: feature_set.names().iter().map(|s| s.to_string()).collect(),
            training_rows: training.len(),
            r_squared,
            dataset_hash: dataset_hash(bars),
            config_hash: self.config.config_hash()?,
        })
    }
}

/// Convenience entry point with the default linear regressor.
pub fn run_strategy(
    bars: &[Bar],
    override_open: Option<f64>,
    config: &PredictorConfig,
) -> Result<PredictionReport, RunError> {
    StrategyRunner::new(config.clone()).run(bars, override_open)
}

/// The one value of a close-price output vector.
fn single_output(values: &[f64]) -> Result<f64, ModelError> {
    match values {
        [v] => Ok(*v),
        other => Err(ModelError::DimensionMismatch {
            expected: 1,
            got: other.len(),
        }),
    }
}

/// R² of the fitted model on its own scaled training data.
///
/// Computed through the [`TrainedModel`] seam so it works for any regressor.
fn in_sample_r_squared<M: TrainedModel>(
    model: &M,
    x: &[Vec<f64>],
    y: &[Vec<f64>],
) -> Result<f64, ModelError> {
    let n = y.len() as f64;
    let mean = y.iter().map(|r| r[0]).sum::<f64>() / n;
    let mut ss_tot = 0.0;
    let mut ss_res = 0.0;
    for (row, label) in x.iter().zip(y) {
        let pred = single_output(&model.predict(row)?)?;
        ss_tot += (label[0] - mean).powi(2);
        ss_res += (label[0] - pred).powi(2);
    }
    Ok(if ss_tot.abs() < 1e-12 {
        1.0
    } else {
        1.0 - ss_res / ss_tot
    })
}
