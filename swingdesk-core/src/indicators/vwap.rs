//! Volume-Weighted Average Price (VWAP) over a trailing window.
//!
//! VWAP = Σ(typical_price * volume) / Σ(volume), typical_price = (H+L+C)/3.
//! Zero cumulative volume (or no bars) returns 0.

use super::window;
use crate::domain::Bar;

pub fn vwap(bars: &[Bar], period: usize) -> f64 {
    let w = window(bars, period);
    let (pv, vol) = w.iter().fold((0.0, 0.0), |(pv, vol), b| {
        let v = b.volume as f64;
        (pv + b.typical_price() * v, vol + v)
    });
    if vol == 0.0 {
        return 0.0;
    }
    pv / vol
}
