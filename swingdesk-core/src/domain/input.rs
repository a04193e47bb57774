//! StrategyInput: everything a policy may read for one decision.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Bar, PositionSnapshot, RegimeClassification, ScoreBundle};

/// The complete bundle a policy consumes. A policy reads nothing outside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyInput {
    pub date: NaiveDate,
    pub regime: RegimeClassification,
    pub scores: ScoreBundle,
    /// Ascending by date, most recent last.
    pub bars: Vec<Bar>,
    #[serde(default)]
    pub position: Option<PositionSnapshot>,
    /// Portfolio-wide open position count.
    #[serde(default)]
    pub open_positions: usize,
    pub available_capital: f64,
}

impl StrategyInput {
    pub fn symbol(&self) -> &str {
        &self.scores.symbol
    }

    pub fn last_bar(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// All bars except the most recent one.
    pub fn prior_bars(&self) -> &[Bar] {
        &self.bars[..self.bars.len().saturating_sub(1)]
    }
}
