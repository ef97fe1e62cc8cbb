//! CloseCast Core — bars, indicators, lagged features, scaling, regression.
//!
//! This crate holds everything with precise numeric content:
//! - Domain type [`domain::Bar`]
//! - Pure indicator functions (TR, ATR, SMA, EMA, RSI, VWAP)
//! - The lagged feature builder with its [`features::FeatureSet`] presets
//! - An invertible per-column [`scaler::MinMaxScaler`]
//! - The [`model::Regressor`] seam and a ridge-stabilised least-squares solver
//! - BLAKE3 fingerprints of datasets and configurations

pub mod domain;
pub mod features;
pub mod fingerprint;
pub mod indicators;
pub mod model;
pub mod scaler;

pub use domain::Bar;
pub use features::{FeatureConfig, FeatureError, FeatureMatrix, FeatureSet};
pub use model::{LinearModel, LinearRegression, ModelError, Regressor, TrainedModel};
pub use scaler::{ColumnRange, MinMaxScaler, ScaleError};
