//! Relative Strength Index (RSI), Wilder smoothing.
//!
//! Seed: average gain and average loss over the first `period` close changes.
//! Recurrence: avg = (avg * (period-1) + x) / period for every later change.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//!
//! Fewer than period+1 bars returns the neutral 50. Zero average loss returns 100.

use crate::domain::Bar;

/// RSI at the most recent bar, always within [0, 100].
pub fn rsi(bars: &[Bar], period: usize) -> f64 {
    let n = bars.len();
    if period == 0 || n < period + 1 {
        return 50.0;
    }

    let p = period as f64;
    let change = |i: usize| bars[i].close - bars[i - 1].close;

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for i in 1..=period {
        let ch = change(i);
        if ch > 0.0 {
            gain_sum += ch;
        } else {
            loss_sum -= ch;
        }
    }
    let mut avg_gain = gain_sum / p;
    let mut avg_loss = loss_sum / p;

    for i in (period + 1)..n {
        let ch = change(i);
        let gain = if ch > 0.0 { ch } else { 0.0 };
        let loss = if ch < 0.0 { -ch } else { 0.0 };
        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;
    }

    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn insufficient_history_is_neutral() {
        let bars = make_bars(&[10.0, 11.0, 12.0]);
        assert_eq!(rsi(&bars, 14), 50.0);
        assert_eq!(rsi(&bars, 0), 50.0);
    }

    #[test]
    fn only_gains_is_100() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        assert_eq!(rsi(&make_bars(&closes), 14), 100.0);
    }

    #[test]
    fn flat_series_is_100() {
        // No losses at all, including zero changes
        assert_eq!(rsi(&make_bars(&[50.0; 20]), 14), 100.0);
    }

    #[test]
    fn only_losses_is_zero() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        assert_approx(rsi(&make_bars(&closes), 14), 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn equal_gains_and_losses_is_50() {
        // Seed window of two changes: +1, -1 → avg gain == avg loss
        let bars = make_bars(&[10.0, 11.0, 10.0]);
        assert_approx(rsi(&bars, 2), 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn wilder_recurrence() {
        // period 2: seed changes +2, -1 → ag=1.0, al=0.5
        // next change +1 → ag=(1*1+1)/2=1.0, al=(0.5*1+0)/2=0.25 → rs=4 → 80
        let bars = make_bars(&[10.0, 12.0, 11.0, 12.0]);
        assert_approx(rsi(&bars, 2), 80.0, DEFAULT_EPSILON);
    }
}
