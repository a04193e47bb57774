//! Snapshot of an already-open position.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable view of a held long position. Its presence on a
/// [`StrategyInput`](super::StrategyInput) switches a policy into exit mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub symbol: String,
    pub entry_price: f64,
    pub quantity: u64,
    pub stop_loss: f64,
    pub target: f64,
    pub entry_time: DateTime<Utc>,
    pub strategy_id: String,
    pub signal_id: String,
}
