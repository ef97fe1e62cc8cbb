//! Exponential Moving Average (EMA).
//!
//! Seed: SMA at `index = period` (mean close of `[0, period)`).
//! Recurrence: `ema = (close[i] - ema) * 2/(period+1) + ema` for `i` in
//! `period..index`, so the close at `index` itself is never read.
//!
//! Each call replays the recurrence from the seed, which is O(index) per
//! call. Fine for daily histories of a few thousand bars.

use super::clamp_end;
use super::sma::simple_moving_average;
use crate::domain::Bar;

/// EMA of closes up to (excluding) `index`.
///
/// Falls back to [`simple_moving_average`] when `index < period`.
pub fn exponential_moving_average(bars: &[Bar], index: usize, period: usize) -> f64 {
    if period == 0 || index < period {
        return simple_moving_average(bars, index, period);
    }
    let end = clamp_end(bars.len(), index);
    if end < period {
        return simple_moving_average(bars, index, period);
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut ema = simple_moving_average(bars, period, period);
    for bar in &bars[period..end] {
        ema = (bar.close - ema) * alpha + ema;
    }
    ema
}
