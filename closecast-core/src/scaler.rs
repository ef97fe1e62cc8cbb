//! Min-max scaling of feature and label matrices.
//!
//! Each column is mapped linearly onto [0, 1] using the min and max seen at
//! fit time. Values outside the fitted range map outside [0, 1]; nothing is
//! clipped, so a prediction row beyond the training range extrapolates.
//!
//! A column with `max == min` has no range. It scales to the midpoint 0.5 and
//! inverse-scales back to `min`, whatever value went in. That loss is the
//! defined behaviour, not something to paper over.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScaleError {
    #[error("row width {got} does not match scaler width {expected}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("ragged matrix: row {row} has width {got}, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        got: usize,
    },
}

/// Observed range of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnRange {
    pub min: f64,
    pub max: f64,
}

impl ColumnRange {
    /// Value assigned to every entry of a zero-range column.
    pub const MIDPOINT: f64 = 0.5;

    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    pub fn scale(&self, v: f64) -> f64 {
        if self.is_degenerate() {
            Self::MIDPOINT
        } else {
            (v - self.min) / (self.max - self.min)
        }
    }

    pub fn inverse(&self, v: f64) -> f64 {
        v * (self.max - self.min) + self.min
    }
}

/// Per-column min-max scaler. Fitted once, then read-only.
///
/// An empty scaler (fitted on an empty matrix) passes rows through
/// unchanged; callers are expected to guard against training on nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    columns: Vec<ColumnRange>,
}

impl MinMaxScaler {
    /// Fit per-column min/max over `matrix`.
    pub fn fit(matrix: &[Vec<f64>]) -> Result<Self, ScaleError> {
        let Some(first) = matrix.first() else {
            return Ok(Self::default());
        };
        let width = first.len();
        let mut columns: Vec<ColumnRange> = first
            .iter()
            .map(|&v| ColumnRange { min: v, max: v })
            .collect();

        for (r, row) in matrix.iter().enumerate().skip(1) {
            if row.len() != width {
                return Err(ScaleError::RaggedMatrix {
                    row: r,
                    expected: width,
                    got: row.len(),
                });
            }
            for (col, &v) in columns.iter_mut().zip(row) {
                col.min = col.min.min(v);
                col.max = col.max.max(v);
            }
        }

        let degenerate = columns.iter().filter(|c| c.is_degenerate()).count();
        if degenerate > 0 {
            tracing::warn!(
                degenerate,
                width,
                rows = matrix.len(),
                "zero-range columns will scale to the midpoint"
            );
        }

        Ok(Self { columns })
    }

    /// Number of fitted columns (0 for an empty scaler).
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[ColumnRange] {
        &self.columns
    }

    pub fn scale(&self, row: &[f64]) -> Result<Vec<f64>, ScaleError> {
        if self.is_empty() {
            return Ok(row.to_vec());
        }
        self.check_width(row)?;
        Ok(self.columns.iter().zip(row).map(|(c, &v)| c.scale(v)).collect())
    }

    /// Scale every row, preserving order.
    pub fn scale_all(&self, matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ScaleError> {
        matrix.iter().map(|row| self.scale(row)).collect()
    }

    pub fn inverse_scale(&self, row: &[f64]) -> Result<Vec<f64>, ScaleError> {
        if self.is_empty() {
            return Ok(row.to_vec());
        }
        self.check_width(row)?;
        Ok(self
            .columns
            .iter()
            .zip(row)
            .map(|(c, &v)| c.inverse(v))
            .collect())
    }

    fn check_width(&self, row: &[f64]) -> Result<(), ScaleError> {
        if row.len() != self.columns.len() {
            return Err(ScaleError::DimensionMismatch {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        Ok(())
    }
}
