//! Market-wide regime classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Directional market regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Regime {
    Bull,
    Sideways,
    Bear,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Regime::Bull => "BULL",
            Regime::Sideways => "SIDEWAYS",
            Regime::Bear => "BEAR",
        };
        f.write_str(s)
    }
}

/// Regime plus the classifier's confidence in [0, 1]. Shared across all
/// symbols for a given day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeClassification {
    pub regime: Regime,
    pub confidence: f64,
}

impl RegimeClassification {
    pub fn new(regime: Regime, confidence: f64) -> Self {
        Self { regime, confidence }
    }

    pub fn is_bear(&self) -> bool {
        self.regime == Regime::Bear
    }
}
