//! Volume-Weighted Average Price (VWAP).
//!
//! Cumulative typical price × volume over `[0, index]` inclusive, divided by
//! cumulative volume. Bars without volume contribute nothing.

use crate::domain::Bar;

pub fn volume_weighted_average_price(bars: &[Bar], index: usize) -> f64 {
    let Some(current) = bars.get(index) else {
        return 0.0;
    };
    if index == 0 {
        return current.close;
    }

    let (weighted, volume) = bars[..=index]
        .iter()
        .fold((0.0, 0.0), |(pv, v), bar| {
            let vol = bar.volume.unwrap_or(0.0);
            (pv + bar.typical_price() * vol, v + vol)
        });

    if volume == 0.0 {
        current.close
    } else {
        weighted / volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc_bars, DEFAULT_EPSILON};

    #[test]
    fn vwap_weights_by_volume() {
        let mut bars = make_ohlc_bars(&[
            (10.0, 12.0, 9.0, 11.0),  // typical 32/3
            (11.0, 15.0, 10.0, 14.0), // typical 13
        ]);
        bars[0].volume = Some(100.0);
        bars[1].volume = Some(300.0);
        let expected = (32.0 / 3.0 * 100.0 + 13.0 * 300.0) / 400.0;
        assert_approx(volume_weighted_average_price(&bars, 1), expected, DEFAULT_EPSILON);
    }

    #[test]
    fn vwap_first_bar_is_close() {
        let bars = make_ohlc_bars(&[(10.0, 12.0, 9.0, 11.0), (11.0, 15.0, 10.0, 14.0)]);
        assert_eq!(volume_weighted_average_price(&bars, 0), 11.0);
    }

    #[test]
    fn vwap_zero_volume_is_close() {
        let mut bars = make_ohlc_bars(&[(10.0, 12.0, 9.0, 11.0), (11.0, 15.0, 10.0, 14.0)]);
        bars[0].volume = None;
        bars[1].volume = Some(0.0);
        assert_eq!(volume_weighted_average_price(&bars, 1), 14.0);
    }

    #[test]
    fn vwap_ignores_later_bars() {
        let mut bars = make_ohlc_bars(&[
            (10.0, 12.0, 9.0, 11.0),
            (11.0, 15.0, 10.0, 14.0),
            (14.0, 30.0, 13.0, 29.0),
        ]);
        let before = volume_weighted_average_price(&bars, 1);
        bars[2].volume = Some(1e9);
        assert_eq!(volume_weighted_average_price(&bars, 1), before);
    }

    #[test]
    fn vwap_missing_bar_is_zero() {
        let bars = make_ohlc_bars(&[(10.0, 12.0, 9.0, 11.0)]);
        assert_eq!(volume_weighted_average_price(&bars, 5), 0.0);
    }
}
