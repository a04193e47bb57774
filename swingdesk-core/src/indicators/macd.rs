//! Moving Average Convergence Divergence (MACD).
//!
//! line = EMA(fast) - EMA(slow) of closes.
//! signal = EMA(signal_period) of the MACD line series (starting where the
//! slow EMA is seeded).
//! histogram = line - signal.
//!
//! Fewer than slow + signal_period bars returns all zeros, as does a fast
//! period longer than the slow one.

use serde::{Deserialize, Serialize};

use super::ema::ema_series;
use crate::domain::Bar;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macd {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

pub fn macd(bars: &[Bar], fast: usize, slow: usize, signal_period: usize) -> Macd {
    let n = bars.len();
    if fast == 0 || slow == 0 || signal_period == 0 || fast > slow || n < slow + signal_period {
        return Macd::default();
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let fast_ema = ema_series(&closes, fast);
    let slow_ema = ema_series(&closes, slow);

    let line_series: Vec<f64> = (slow - 1..n).map(|i| fast_ema[i] - slow_ema[i]).collect();
    let signal_series = ema_series(&line_series, signal_period);

    let line = line_series[line_series.len() - 1];
    let signal = signal_series[signal_series.len() - 1];
    Macd {
        line,
        signal,
        histogram: line - signal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn insufficient_history_is_zero() {
        let closes: Vec<f64> = (0..34).map(|i| 100.0 + i as f64).collect();
        assert_eq!(macd(&make_bars(&closes), 12, 26, 9), Macd::default());
    }

    #[test]
    fn constant_prices_have_zero_macd() {
        let m = macd(&make_bars(&[50.0; 60]), 12, 26, 9);
        assert_approx(m.line, 0.0, 1e-9);
        assert_approx(m.signal, 0.0, 1e-9);
        assert_approx(m.histogram, 0.0, 1e-9);
    }

    #[test]
    fn linear_trend_converges_to_lag_difference() {
        // SMA-seeded EMA of a linear series lags by slope*(period-1)/2 exactly,
        // so line = 0.5*(25-11)/2 = 3.5 and the signal of a constant line is 3.5.
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + 0.5 * i as f64).collect();
        let m = macd(&make_bars(&closes), 12, 26, 9);
        assert_approx(m.line, 3.5, 1e-9);
        assert_approx(m.signal, 3.5, 1e-9);
        assert_approx(m.histogram, 0.0, 1e-9);
    }

    #[test]
    fn degenerate_periods_are_zero() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        assert_eq!(macd(&bars, 0, 26, 9), Macd::default());
        assert_eq!(macd(&bars, 26, 12, 9), Macd::default());
    }
}
