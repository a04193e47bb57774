//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|).
//! ATR is the simple mean of the last `period` true ranges.
//! Needs period+1 bars; otherwise falls back to the last bar's high-low.

use crate::domain::Bar;

/// True range of `bar` given the previous close. Without a previous close
/// the true range is the bar's own range.
pub fn true_range(bar: &Bar, prev_close: Option<f64>) -> f64 {
    let high_low = bar.high - bar.low;
    match prev_close {
        Some(pc) => high_low
            .max((bar.high - pc).abs())
            .max((bar.low - pc).abs()),
        None => high_low,
    }
}

/// ATR at the most recent bar.
pub fn atr(bars: &[Bar], period: usize) -> f64 {
    let Some(last) = bars.last() else {
        return 0.0;
    };
    let n = bars.len();
    if period == 0 || n < period + 1 {
        return last.range();
    }

    let sum: f64 = (n - period..n)
        .map(|i| true_range(&bars[i], Some(bars[i - 1].close)))
        .sum();
    sum / period as f64
}
