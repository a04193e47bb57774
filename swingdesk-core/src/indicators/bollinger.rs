//! Bollinger Bands.
//!
//! middle = SMA(period) of closes; stddev is the population deviation (÷ period);
//! upper/lower = middle ± stddev * mult; bandwidth = (upper - lower) / middle.
//!
//! Fewer than `period` bars, or a zero middle band, returns all zeros.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub middle: f64,
    pub upper: f64,
    pub lower: f64,
    pub bandwidth: f64,
}

pub fn bollinger(bars: &[Bar], period: usize, mult: f64) -> BollingerBands {
    if period == 0 || bars.len() < period {
        return BollingerBands::default();
    }

    let closes = &bars[bars.len() - period..];
    let p = period as f64;
    let middle = closes.iter().map(|b| b.close).sum::<f64>() / p;
    if middle == 0.0 {
        return BollingerBands::default();
    }

    let variance = closes
        .iter()
        .map(|b| (b.close - middle).powi(2))
        .sum::<f64>()
        / p;
    let stddev = variance.sqrt();
    let upper = middle + stddev * mult;
    let lower = middle - stddev * mult;

    BollingerBands {
        middle,
        upper,
        lower,
        bandwidth: (upper - lower) / middle,
    }
}
