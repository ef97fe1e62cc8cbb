//! Regression seam.
//!
//! The prediction pipeline only needs "fit(X, y) → model" and
//! "model.predict(x) → y". [`Regressor`] and [`TrainedModel`] capture exactly
//! that so the solver can be swapped (or mocked in tests) without touching the
//! runner. [`LinearRegression`] is the default solver.

pub mod linear;

pub use linear::{LinearModel, LinearRegression};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("cannot fit a model on an empty training set")]
    EmptyTrainingSet,
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("normal equations are singular (pivot {pivot} at column {column}); raise the ridge term")]
    Singular { column: usize, pivot: f64 },
    #[error("invalid model parameter: {0}")]
    InvalidParameter(String),
}

/// A fitted model. Immutable after fit.
pub trait TrainedModel: Send + Sync {
    /// Number of features a row must have.
    fn input_width(&self) -> usize;

    /// Predict one label row from one feature row.
    fn predict(&self, row: &[f64]) -> Result<Vec<f64>, ModelError>;
}

/// Something that can fit a [`TrainedModel`] from a design matrix and labels.
pub trait Regressor {
    type Model: TrainedModel;

    fn fit(&self, x: &[Vec<f64>], y: &[Vec<f64>]) -> Result<Self::Model, ModelError>;
}
