//! TradeIntent: the single output of a policy evaluation.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ScoreBundle, SignalId};

/// What a policy proposes for a symbol today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeAction {
    Buy,
    Hold,
    Exit,
    Skip,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TradeAction::Buy => "BUY",
            TradeAction::Hold => "HOLD",
            TradeAction::Exit => "EXIT",
            TradeAction::Skip => "SKIP",
        };
        f.write_str(s)
    }
}

/// A non-binding proposal forwarded to the risk/broker layer.
///
/// `reason` names the rule that produced the action and the values it saw.
/// `scores` is a snapshot of the bundle used, kept for the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeIntent {
    pub strategy_id: String,
    pub signal_id: SignalId,
    pub symbol: String,
    pub action: TradeAction,
    pub price: f64,
    pub stop_loss: f64,
    pub target: f64,
    pub quantity: u64,
    pub reason: String,
    pub scores: ScoreBundle,
}

impl TradeIntent {
    pub fn is_actionable(&self) -> bool {
        matches!(self.action, TradeAction::Buy | TradeAction::Exit)
    }

    /// BLAKE3 fingerprint of the intent's canonical JSON form.
    ///
    /// Two intents with identical fields always hash identically, so the audit
    /// store can detect duplicate or altered records.
    pub fn fingerprint(&self) -> String {
        use serde_json::json;

        let canonical = json!({
            "strategy_id": &self.strategy_id,
            "signal_id": self.signal_id.as_str(),
            "symbol": &self.symbol,
            "action": self.action.to_string(),
            "price": self.price,
            "stop_loss": self.stop_loss,
            "target": self.target,
            "quantity": self.quantity,
            "reason": &self.reason,
            "scores": &self.scores,
        });

        blake3::hash(canonical.to_string().as_bytes())
            .to_hex()
            .to_string()
    }
}
