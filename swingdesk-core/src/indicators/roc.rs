//! Rate of Change (ROC).
//!
//! ROC = (close - close[period ago]) / close[period ago], as a fraction.
//! Fewer than period+1 bars, or a zero base close, returns 0.

use crate::domain::Bar;

pub fn roc(bars: &[Bar], period: usize) -> f64 {
    let n = bars.len();
    if period == 0 || n < period + 1 {
        return 0.0;
    }
    let past = bars[n - 1 - period].close;
    if past == 0.0 {
        return 0.0;
    }
    (bars[n - 1].close - past) / past
}
