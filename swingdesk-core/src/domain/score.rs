//! ScoreBundle: the nightly quality scores for one symbol.

use serde::{Deserialize, Serialize};

/// Five independent scores in [0, 1] plus optional composite and rank.
///
/// `risk` is inverted relative to the others: lower is safer. `rank` is
/// 1-based across the scored universe and may be absent when the scorer did
/// not rank this symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBundle {
    pub symbol: String,
    pub trend_strength: f64,
    pub breakout_quality: f64,
    pub volatility: f64,
    pub risk: f64,
    pub liquidity: f64,
    #[serde(default)]
    pub composite: Option<f64>,
    #[serde(default)]
    pub rank: Option<u32>,
}

impl ScoreBundle {
    /// True when every present score lies in [0, 1].
    pub fn is_in_unit_range(&self) -> bool {
        let unit = |v: f64| (0.0..=1.0).contains(&v);
        unit(self.trend_strength)
            && unit(self.breakout_quality)
            && unit(self.volatility)
            && unit(self.risk)
            && unit(self.liquidity)
            && self.composite.map_or(true, unit)
    }
}
