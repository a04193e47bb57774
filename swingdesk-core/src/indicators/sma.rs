//! Simple Moving Average (SMA).
//!
//! Mean of the last `period` closes. Fewer than `period` bars returns 0.

use crate::domain::Bar;

pub fn sma(bars: &[Bar], period: usize) -> f64 {
    if period == 0 || bars.len() < period {
        return 0.0;
    }
    let sum: f64 = bars[bars.len() - period..].iter().map(|b| b.close).sum();
    sum / period as f64
}
