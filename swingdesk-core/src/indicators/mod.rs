//! Technical indicator library.
//!
//! Every indicator is a stateless function over an ascending bar slice
//! (most recent last) that returns the value at the latest bar. None of them
//! fail: when the window is unavailable each returns its documented fallback,
//! and policies treat those sentinels ("neutral" RSI 50, zero SMA/VWAP/bands)
//! as a reason to skip.
//!
//! | Indicator | Fallback |
//! |---|---|
//! | ATR | fewer than period+1 bars: last bar's range; no bars: 0 |
//! | RSI | fewer than period+1 bars: 50; no losses: 100 |
//! | SMA / EMA | fewer than period bars: 0 |
//! | ROC | insufficient bars or zero base: 0 |
//! | Highest high / lowest low | no bars: 0 (window clamps to available bars) |
//! | VWAP | zero volume: 0 |
//! | MACD | fewer than slow+signal bars: all zero |
//! | Bollinger | fewer than period bars or zero middle: all zero |
//! | Average volume | no bars: 0 |

pub mod atr;
pub mod bollinger;
pub mod donchian;
pub mod ema;
pub mod macd;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod volume;
pub mod vwap;

pub use atr::{atr, true_range};
pub use bollinger::{bollinger, BollingerBands};
pub use donchian::{highest_high, lowest_low};
pub use ema::{ema, ema_series};
pub use macd::{macd, Macd};
pub use roc::roc;
pub use rsi::rsi;
pub use sma::sma;
pub use volume::average_volume;
pub use vwap::vwap;

use crate::domain::Bar;

/// The trailing `period` bars, clamped to what is available.
pub(crate) fn window(bars: &[Bar], period: usize) -> &[Bar] {
    &bars[bars.len().saturating_sub(period)..]
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                symbol: "TEST".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Single bar with explicit OHLCV, dated `day` days after 2024-01-02.
#[cfg(test)]
pub fn make_bar(day: i64, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Bar {
    Bar {
        symbol: "TEST".to_string(),
        date: chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap() + chrono::Duration::days(day),
        open,
        high,
        low,
        close,
        volume,
    }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_clamps_to_available_bars() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        assert_eq!(window(&bars, 2).len(), 2);
        assert_eq!(window(&bars, 10).len(), 3);
        assert_eq!(window(&bars, 0).len(), 0);
        assert_eq!(window(&bars, 2)[0].close, 2.0);
    }
}
