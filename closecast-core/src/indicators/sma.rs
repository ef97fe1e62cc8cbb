//! Simple Moving Average (SMA).
//!
//! Mean of close prices over `[index-period, index)`, the `period` bars
//! strictly before `index`.

use super::clamp_end;
use crate::domain::Bar;

/// Mean close over the `period` bars preceding `index`.
///
/// With insufficient history returns the close of `bars[index]`, or 0.0 when
/// that bar does not exist.
pub fn simple_moving_average(bars: &[Bar], index: usize, period: usize) -> f64 {
    let end = clamp_end(bars.len(), index);
    if period == 0 || end < period {
        return bars.get(index).map_or(0.0, |b| b.close);
    }
    let sum: f64 = bars[end - period..end].iter().map(|b| b.close).sum();
    sum / period as f64
}
