//! Highest high / lowest low over a trailing window.
//!
//! The window clamps to the available bars. No bars (or period 0) returns 0.

use super::window;
use crate::domain::Bar;

pub fn highest_high(bars: &[Bar], period: usize) -> f64 {
    let w = window(bars, period);
    if w.is_empty() {
        return 0.0;
    }
    w.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max)
}

pub fn lowest_low(bars: &[Bar], period: usize) -> f64 {
    let w = window(bars, period);
    if w.is_empty() {
        return 0.0;
    }
    w.iter().map(|b| b.low).fold(f64::INFINITY, f64::min)
}
