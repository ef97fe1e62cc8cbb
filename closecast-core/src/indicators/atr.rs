//! True Range and Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|).
//! ATR here is the simple mean of true range over the `period` bars strictly
//! before `index`, i.e. the window `[index-period, index)`.

use super::clamp_end;
use crate::domain::Bar;

/// True range of `bar` against the previous close.
pub fn true_range(bar: &Bar, prev_close: f64) -> f64 {
    (bar.high - bar.low)
        .max((bar.high - prev_close).abs())
        .max((bar.low - prev_close).abs())
}

/// True range of `bars[index]`, taking the previous close from `bars[index-1]`.
///
/// The first bar has no predecessor and uses its own close.
///
/// # Panics
/// If `index` is out of bounds.
pub fn true_range_at(bars: &[Bar], index: usize) -> f64 {
    let bar = &bars[index];
    let prev_close = if index == 0 {
        bar.close
    } else {
        bars[index - 1].close
    };
    true_range(bar, prev_close)
}

/// Mean true range over `[index-period, index)`.
///
/// Returns 0.0 when fewer than `period` bars precede `index`. That sentinel is
/// not a meaningful ATR; it only keeps early feature rows numeric.
pub fn average_true_range(bars: &[Bar], index: usize, period: usize) -> f64 {
    let end = clamp_end(bars.len(), index);
    if period == 0 || end < period {
        return 0.0;
    }
    let sum: f64 = (end - period..end).map(|j| true_range_at(bars, j)).sum();
    sum / period as f64
}
