//! Decision policies.
//!
//! Every policy implements [`Strategy`]: a pure `evaluate` that maps one
//! [`StrategyInput`] to exactly one [`TradeIntent`]. A held position selects
//! the exit chain, otherwise the entry chain runs. Both chains short-circuit on
//! the first rule that decides, and every outcome carries a reason naming the
//! rule and the values it saw.
//!
//! The two-phase driver lives here in [`decide`]; each policy only supplies
//! its entry setup and its exit rules.

pub mod bollinger_squeeze;
pub mod breakout;
pub mod macd_crossover;
pub mod mean_reversion;
pub mod momentum;
pub mod orb;
pub mod pullback;
pub mod registry;
pub mod rules;
pub mod trend_follow;
pub mod vwap_reversion;

pub use bollinger_squeeze::{BollingerSqueeze, BollingerSqueezeParams};
pub use breakout::{Breakout, BreakoutParams};
pub use macd_crossover::{MacdCrossover, MacdCrossoverParams};
pub use mean_reversion::{MeanReversion, MeanReversionParams};
pub use momentum::{Momentum, MomentumParams};
pub use orb::{OpeningRangeBreakout, OrbParams};
pub use pullback::{Pullback, PullbackParams};
pub use registry::{build_strategies, create_strategy, ALL_STRATEGY_IDS};
pub use trend_follow::{TrendFollow, TrendFollowParams};
pub use vwap_reversion::{VwapReversion, VwapReversionParams};

use tracing::{debug, info};

use crate::domain::{PositionSnapshot, SignalId, StrategyInput, TradeAction, TradeIntent};
use crate::sizing::FixedFractionalSizer;

/// A swing-trading decision policy.
///
/// Implementations must be deterministic: identical input yields an identical
/// intent. They hold only immutable configuration, so one instance may be
/// shared across threads.
pub trait Strategy: Send + Sync {
    /// Stable identifier, e.g. `trend_follow_v1`. Part of every signal ID.
    fn id(&self) -> &'static str;

    /// Human-readable name.
    fn name(&self) -> &'static str;

    fn evaluate(&self, input: &StrategyInput) -> TradeIntent;
}

/// Entry levels produced by a policy's entry chain, before sizing.
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySetup {
    pub price: f64,
    pub stop_loss: f64,
    pub target: f64,
    pub reason: String,
}

/// Run the two-phase contract for one policy.
///
/// `entry` returns `Err(reason)` to SKIP. `exit` returns `Some(reason)` to
/// EXIT the whole position, `None` to HOLD. The BEAR circuit breaker runs
/// before any policy exit rule.
pub(crate) fn decide<E, X>(
    strategy_id: &'static str,
    sizer: &FixedFractionalSizer,
    input: &StrategyInput,
    entry: E,
    exit: X,
) -> TradeIntent
where
    E: FnOnce() -> Result<EntrySetup, String>,
    X: FnOnce(&PositionSnapshot) -> Option<String>,
{
    let intent = match &input.position {
        Some(position) => exit_phase(strategy_id, input, position, exit),
        None => entry_phase(strategy_id, sizer, input, entry),
    };

    debug!(
        strategy = strategy_id,
        symbol = %intent.symbol,
        action = %intent.action,
        reason = %intent.reason,
        "decision"
    );
    if intent.is_actionable() {
        info!(
            strategy = strategy_id,
            symbol = %intent.symbol,
            action = %intent.action,
            price = intent.price,
            quantity = intent.quantity,
            "{}",
            intent.reason
        );
    }

    intent
}

fn exit_phase<X>(
    strategy_id: &'static str,
    input: &StrategyInput,
    position: &PositionSnapshot,
    exit: X,
) -> TradeIntent
where
    X: FnOnce(&PositionSnapshot) -> Option<String>,
{
    let exit_reason = if input.regime.is_bear() {
        Some(format!(
            "market regime turned BEAR (confidence {:.2})",
            input.regime.confidence
        ))
    } else {
        exit(position)
    };

    let price = input.last_close().unwrap_or(0.0);
    let (action, quantity, reason) = match exit_reason {
        Some(reason) => (TradeAction::Exit, position.quantity, reason),
        None => (
            TradeAction::Hold,
            0,
            format!(
                "holding: no exit rule met (close {:.2}, trend {:.2}, regime {} {:.2})",
                price,
                input.scores.trend_strength,
                input.regime.regime,
                input.regime.confidence
            ),
        ),
    };

    TradeIntent {
        price,
        stop_loss: position.stop_loss,
        target: position.target,
        quantity,
        ..blank_intent(strategy_id, input, action, reason)
    }
}

fn entry_phase<E>(
    strategy_id: &'static str,
    sizer: &FixedFractionalSizer,
    input: &StrategyInput,
    entry: E,
) -> TradeIntent
where
    E: FnOnce() -> Result<EntrySetup, String>,
{
    let setup = match entry().and_then(rules::sound_levels) {
        Ok(setup) => setup,
        Err(reason) => return blank_intent(strategy_id, input, TradeAction::Skip, reason),
    };

    match sizer.size(setup.price, setup.stop_loss, input.available_capital) {
        Ok(quantity) => TradeIntent {
            price: setup.price,
            stop_loss: setup.stop_loss,
            target: setup.target,
            quantity,
            ..blank_intent(strategy_id, input, TradeAction::Buy, setup.reason)
        },
        Err(e) => blank_intent(strategy_id, input, TradeAction::Skip, e.to_string()),
    }
}

fn blank_intent(
    strategy_id: &'static str,
    input: &StrategyInput,
    action: TradeAction,
    reason: String,
) -> TradeIntent {
    let symbol = input.symbol().to_string();
    TradeIntent {
        strategy_id: strategy_id.to_string(),
        signal_id: SignalId::new(strategy_id, &symbol, input.date),
        symbol,
        action,
        price: 0.0,
        stop_loss: 0.0,
        target: 0.0,
        quantity: 0,
        reason,
        scores: input.scores.clone(),
    }
}
