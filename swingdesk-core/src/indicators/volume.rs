//! Average volume over a trailing window (clamped to available bars).

use super::window;
use crate::domain::Bar;

pub fn average_volume(bars: &[Bar], period: usize) -> f64 {
    let w = window(bars, period);
    if w.is_empty() {
        return 0.0;
    }
    let total: f64 = w.iter().map(|b| b.volume as f64).sum();
    total / w.len() as f64
}
