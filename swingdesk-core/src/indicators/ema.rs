//! Exponential Moving Average (EMA).
//!
//! Seed: SMA of the first `period` values.
//! Recurrence: ema = (value - ema) * k + ema, with k = 2 / (period + 1).
//! Fewer than `period` values returns 0.

use crate::domain::Bar;

/// EMA series over arbitrary values.
///
/// The output has the same length as the input; indices before the seed
/// (`period - 1`) are NaN. Returns all-NaN when there are fewer than `period`
/// values.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = values[..period].iter().sum::<f64>() / period as f64;
    result[period - 1] = ema;

    for i in period..n {
        ema = (values[i] - ema) * k + ema;
        result[i] = ema;
    }

    result
}

/// EMA of closes at the most recent bar.
pub fn ema(bars: &[Bar], period: usize) -> f64 {
    if period == 0 || bars.len() < period {
        return 0.0;
    }
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    ema_series(&closes, period).last().copied().unwrap_or(0.0)
}
