//! Lagged feature builder.
//!
//! Turns an ordered bar slice into a design matrix for next-close regression.
//! For every predictable day `i` (from `lookback_period` to the last bar),
//! "today" is `bars[i]` and "yesterday" is `bars[i - 1]`. The only field of
//! today that enters a feature row is its open; everything else is lagged.
//! The label is today's close.
//!
//! Column composition is fixed per [`FeatureSet`] so a run never mixes
//! row widths.

pub mod feature_set;

pub use feature_set::{FeatureConfig, FeatureSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Bar;
use crate::indicators::{
    average_true_range, exponential_moving_average, relative_strength_index,
    simple_moving_average, volume_weighted_average_price,
};

/// One feature vector.
pub type FeatureRow = Vec<f64>;

/// One label vector (a single element: the day's close).
pub type LabelRow = Vec<f64>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FeatureError {
    #[error("feature set '{feature_set}' needs volume but bar {index} has none")]
    MissingVolume {
        feature_set: FeatureSet,
        index: usize,
    },
    #[error("cannot build a feature row for bar {index}: need 1 <= index < {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Feature rows, labels, and the bar index each pair came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    pub rows: Vec<FeatureRow>,
    pub labels: Vec<LabelRow>,
    pub indices: Vec<usize>,
}

impl FeatureMatrix {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row width, or 0 for an empty matrix.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |r| r.len())
    }
}

/// Build the training matrix for every predictable day in `bars`.
///
/// Returns an empty matrix when `bars.len() <= lookback_period`.
/// Rows are computed in parallel; each one reads `bars` only.
pub fn build(bars: &[Bar], config: &FeatureConfig) -> Result<FeatureMatrix, FeatureError> {
    // Row 0 has no yesterday, so the first row is never earlier than bar 1.
    let start = config.lookback_period.max(1);
    if bars.len() <= start {
        tracing::debug!(
            bars = bars.len(),
            lookback = config.lookback_period,
            "not enough bars for any feature row"
        );
        return Ok(FeatureMatrix::default());
    }

    let built: Vec<(usize, FeatureRow, LabelRow)> = (start..bars.len())
        .into_par_iter()
        .map(|i| {
            let row = feature_row(bars, i, config, bars[i].open)?;
            Ok((i, row, vec![bars[i].close]))
        })
        .collect::<Result<_, FeatureError>>()?;

    let mut matrix = FeatureMatrix {
        rows: Vec::with_capacity(built.len()),
        labels: Vec::with_capacity(built.len()),
        indices: Vec::with_capacity(built.len()),
    };
    for (i, row, label) in built {
        matrix.indices.push(i);
        matrix.rows.push(row);
        matrix.labels.push(label);
    }

    tracing::debug!(
        rows = matrix.len(),
        width = matrix.width(),
        feature_set = %config.feature_set,
        "built feature matrix"
    );
    Ok(matrix)
}

/// Build the feature row for bar `index` with an explicit open price.
///
/// `build` passes the bar's recorded open; the prediction step passes either
/// that or a caller-supplied live open.
///
/// ATR is evaluated at `index` (its window already ends at yesterday) while
/// RSI is evaluated at `index - 1`, one day further back. The two lags differ
/// on purpose and must stay that way for trained models to stay comparable.
pub fn feature_row(
    bars: &[Bar],
    index: usize,
    config: &FeatureConfig,
    open: f64,
) -> Result<FeatureRow, FeatureError> {
    if index == 0 || index >= bars.len() {
        return Err(FeatureError::IndexOutOfRange {
            index,
            len: bars.len(),
        });
    }

    let yesterday = &bars[index - 1];
    let lookback = config.lookback_period;
    let set = config.feature_set;

    let mut row = Vec::with_capacity(set.width());
    row.push(open);
    row.push(yesterday.close);
    row.push(yesterday.high);
    row.push(yesterday.low);
    row.push(yesterday.pivot());

    if set.requires_volume() {
        let volume = yesterday.volume.ok_or(FeatureError::MissingVolume {
            feature_set: set,
            index: index - 1,
        })?;
        row.push(volume);
    }

    row.push(average_true_range(bars, index, lookback));
    row.push(relative_strength_index(bars, index - 1, lookback));

    match set {
        FeatureSet::Minimal => {}
        FeatureSet::Standard => {
            row.push(simple_moving_average(bars, index, config.short_period));
        }
        FeatureSet::Extended => {
            row.push(simple_moving_average(bars, index, config.short_period));
            row.push(exponential_moving_average(bars, index, config.short_period));
            row.push(volume_weighted_average_price(bars, index - 1));
        }
    }

    debug_assert_eq!(row.len(), set.width());
    Ok(row)
}
