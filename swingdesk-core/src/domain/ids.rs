use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Deterministic signal identifier: `{strategy_id}-{symbol}-{YYYY-MM-DD}`.
///
/// Built from the input date, never from wall-clock time, so re-evaluating the
/// same day yields the same ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalId(pub String);

impl SignalId {
    pub fn new(strategy_id: &str, symbol: &str, date: NaiveDate) -> Self {
        Self(format!("{strategy_id}-{symbol}-{}", date.format("%Y-%m-%d")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
