//! Relative Strength Index (RSI).
//!
//! Simple (not Wilder-smoothed) averages of the `period` close-to-close
//! changes ending at `index` inclusive, i.e. changes
//! `close[j] - close[j-1]` for `j` in `(index-period, index]`.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! Edge cases: `index < period` → 50 (neutral); avg_loss == 0 → 100.

use crate::domain::Bar;

/// Neutral value returned when there is not enough history.
pub const NEUTRAL_RSI: f64 = 50.0;

pub fn relative_strength_index(bars: &[Bar], index: usize, period: usize) -> f64 {
    if period == 0 || index < period || index >= bars.len() {
        return NEUTRAL_RSI;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for j in (index + 1 - period)..=index {
        let change = bars[j].close - bars[j - 1].close;
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }
    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn rsi_all_gains() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        assert_eq!(relative_strength_index(&bars, 3, 3), 100.0);
        assert_eq!(relative_strength_index(&bars, 5, 3), 100.0);
    }

    #[test]
    fn rsi_flat_window_is_100() {
        // No losses at all, gains also zero: avg_loss == 0 still wins.
        let bars = make_bars(&[50.0, 50.0, 50.0, 50.0]);
        assert_eq!(relative_strength_index(&bars, 3, 3), 100.0);
    }

    #[test]
    fn rsi_all_losses() {
        let bars = make_bars(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        assert_approx(relative_strength_index(&bars, 3, 3), 0.0, 1e-9);
    }

    #[test]
    fn rsi_mixed() {
        // Closes: 44, 44.34, 44.09, 43.61
        // Changes at j=1..=3: +0.34, -0.25, -0.48
        // RSI = 100 - 100/(1 + 0.34/0.73)
        let bars = make_bars(&[44.0, 44.34, 44.09, 43.61, 44.33]);
        let expected = 100.0 - 100.0 / (1.0 + 0.34 / 0.73);
        assert_approx(relative_strength_index(&bars, 3, 3), expected, 1e-9);
    }

    #[test]
    fn rsi_window_includes_index() {
        // Only the change into bar 4 differs between these two series.
        let up = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let down = make_bars(&[10.0, 11.0, 12.0, 13.0, 12.0]);
        assert_eq!(relative_strength_index(&up, 4, 2), 100.0);
        assert_approx(relative_strength_index(&down, 4, 2), 50.0, 1e-9);
    }

    #[test]
    fn rsi_insufficient_history_is_neutral() {
        let bars = make_bars(&[100.0, 90.0, 80.0]);
        assert_eq!(relative_strength_index(&bars, 1, 3), NEUTRAL_RSI);
        assert_eq!(relative_strength_index(&bars, 2, 3), NEUTRAL_RSI);
        assert_eq!(relative_strength_index(&bars, 2, 0), NEUTRAL_RSI);
    }

    #[test]
    fn rsi_bounds() {
        let bars = make_bars(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0]);
        for i in 0..bars.len() {
            let v = relative_strength_index(&bars, i, 3);
            assert!((0.0..=100.0).contains(&v), "RSI out of bounds at bar {i}: {v}");
        }
    }
}
