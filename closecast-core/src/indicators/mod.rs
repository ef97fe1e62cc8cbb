//! Indicator library.
//!
//! Every indicator is a pure function of an immutable bar slice plus an
//! explicit `index` (and `period` where windowed). There is no cursor state:
//! asking for the same `(bars, index, period)` always yields the same value.
//!
//! Window boundaries are part of the contract. The averaging indicators
//! (ATR, SMA, EMA) look strictly *before* `index`; RSI and VWAP include the
//! bar at `index`. Insufficient history returns a fixed sentinel rather than
//! NaN so feature rows stay fully numeric.

pub mod atr;
pub mod ema;
pub mod rsi;
pub mod sma;
pub mod vwap;

pub use atr::{average_true_range, true_range, true_range_at};
pub use ema::exponential_moving_average;
pub use rsi::relative_strength_index;
pub use sma::simple_moving_average;
pub use vwap::volume_weighted_average_price;

/// Clamp a window end to the number of bars that exist.
pub(crate) fn clamp_end(bars_len: usize, index: usize) -> usize {
    index.min(bars_len)
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: Some(1000.0),
            }
        })
        .collect()
}

/// Bars from explicit (open, high, low, close) tuples, volume = 1000.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume: Some(1000.0),
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
