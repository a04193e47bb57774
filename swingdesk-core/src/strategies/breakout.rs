//! Breakout swing policy.
//!
//! Buys a close above the prior N-day high on expanded volume. The stop sits
//! below the broken resistance, and a close back under the entry price counts
//! as a failed breakout.

use serde::{Deserialize, Serialize};

use super::rules::{
    at_least, at_most, latest_close, require_confidence, require_history, require_regime,
    require_volume, risk_reward_target, RegimeGate,
};
use super::{decide, EntrySetup, Strategy};
use crate::config::{ensure_period, ensure_positive, ensure_unit, ConfigError};
use crate::domain::{PositionSnapshot, StrategyInput, TradeIntent};
use crate::indicators::{atr, average_volume, highest_high};
use crate::sizing::FixedFractionalSizer;

pub const ID: &str = "breakout_v1";
pub const NAME: &str = "Breakout Swing";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BreakoutParams {
    pub min_regime_confidence: f64,
    pub min_breakout_quality: f64,
    pub min_trend_strength: f64,
    pub min_liquidity: f64,
    pub max_risk: f64,
    pub min_history: usize,
    /// Resistance and volume average window, excluding the latest bar.
    pub lookback: usize,
    pub volume_multiplier: f64,
    pub atr_period: usize,
    /// Stop = resistance - ATR × this.
    pub atr_stop_multiplier: f64,
    pub risk_reward: f64,
    pub exit_trend_below: f64,
}

impl Default for BreakoutParams {
    fn default() -> Self {
        Self {
            min_regime_confidence: 0.6,
            min_breakout_quality: 0.7,
            min_trend_strength: 0.5,
            min_liquidity: 0.5,
            max_risk: 0.4,
            min_history: 30,
            lookback: 20,
            volume_multiplier: 1.5,
            atr_period: 14,
            atr_stop_multiplier: 1.5,
            risk_reward: 3.0,
            exit_trend_below: 0.3,
        }
    }
}

impl BreakoutParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_unit("breakout.min_regime_confidence", self.min_regime_confidence)?;
        ensure_unit("breakout.min_breakout_quality", self.min_breakout_quality)?;
        ensure_unit("breakout.min_trend_strength", self.min_trend_strength)?;
        ensure_unit("breakout.min_liquidity", self.min_liquidity)?;
        ensure_unit("breakout.max_risk", self.max_risk)?;
        ensure_unit("breakout.exit_trend_below", self.exit_trend_below)?;
        ensure_period("breakout.min_history", self.min_history)?;
        ensure_period("breakout.lookback", self.lookback)?;
        ensure_period("breakout.atr_period", self.atr_period)?;
        ensure_positive("breakout.volume_multiplier", self.volume_multiplier)?;
        ensure_positive("breakout.atr_stop_multiplier", self.atr_stop_multiplier)?;
        ensure_positive("breakout.risk_reward", self.risk_reward)
    }
}

#[derive(Debug, Clone)]
pub struct Breakout {
    params: BreakoutParams,
    sizer: FixedFractionalSizer,
}

impl Breakout {
    pub fn new(params: BreakoutParams, sizer: FixedFractionalSizer) -> Self {
        Self { params, sizer }
    }

    fn check_entry(&self, input: &StrategyInput) -> Result<EntrySetup, String> {
        let p = &self.params;
        let s = &input.scores;

        require_regime(&input.regime, RegimeGate::BullOnly)?;
        require_confidence(&input.regime, p.min_regime_confidence)?;
        at_least("breakout quality", s.breakout_quality, p.min_breakout_quality)?;
        at_least("trend strength", s.trend_strength, p.min_trend_strength)?;
        at_least("liquidity", s.liquidity, p.min_liquidity)?;
        at_most("risk score", s.risk, p.max_risk)?;
        require_history(&input.bars, p.min_history)?;

        let close = latest_close(input)?;
        let prior = input.prior_bars();
        let resistance = highest_high(prior, p.lookback);
        if close <= resistance {
            return Err(format!(
                "price {:.2} <= {}-day high {:.2} (no breakout)",
                close, p.lookback, resistance
            ));
        }

        let volume = input.last_bar().map_or(0, |b| b.volume);
        let avg_volume = average_volume(prior, p.lookback);
        require_volume(volume, avg_volume, p.volume_multiplier)?;

        let atr = atr(&input.bars, p.atr_period);
        let stop_loss = resistance - atr * p.atr_stop_multiplier;
        let target = risk_reward_target(close, stop_loss, p.risk_reward);

        Ok(EntrySetup {
            price: close,
            stop_loss,
            target,
            reason: format!(
                "breakout: price {:.2} > {}-day high {:.2} on volume {} ({:.1}x average)",
                close,
                p.lookback,
                resistance,
                volume,
                if avg_volume > 0.0 { volume as f64 / avg_volume } else { 0.0 }
            ),
        })
    }

    fn check_exit(&self, input: &StrategyInput, position: &PositionSnapshot) -> Option<String> {
        let p = &self.params;
        let trend = input.scores.trend_strength;
        if trend < p.exit_trend_below {
            return Some(format!(
                "trend strength {:.2} < {:.2} (breakout losing momentum)",
                trend, p.exit_trend_below
            ));
        }

        let close = input.last_close()?;
        (close < position.entry_price).then(|| {
            format!(
                "price {:.2} < entry {:.2} (failed breakout)",
                close, position.entry_price
            )
        })
    }
}

impl Strategy for Breakout {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn evaluate(&self, input: &StrategyInput) -> TradeIntent {
        decide(
            ID,
            &self.sizer,
            input,
            || self.check_entry(input),
            |position| self.check_exit(input, position),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bar, Regime, TradeAction};
    use crate::strategies::test_support::*;

    fn strategy() -> Breakout {
        Breakout::new(BreakoutParams::default(), FixedFractionalSizer::default())
    }

    /// Ascending bars whose last bar gaps to 200 on triple volume.
    fn breaking_out() -> Vec<Bar> {
        let mut bars = ascending(49);
        bars.push(bar(49, 199.0, 202.0, 198.0, 200.0, 300_000));
        bars
    }

    fn strong_scores() -> crate::domain::ScoreBundle {
        scores(0.7, 0.8, 0.5, 0.3, 0.7)
    }

    #[test]
    fn buys_volume_confirmed_breakout() {
        let inp = input(Regime::Bull, 0.8, strong_scores(), breaking_out());
        let intent = strategy().evaluate(&inp);
        assert_eq!(intent.action, TradeAction::Buy, "{}", intent.reason);
        assert_eq!(intent.price, 200.0);
        // stop sits below the broken 20-day high of 126
        assert!(intent.stop_loss < 126.0);
        assert!(intent.target > intent.price);
        assert!(intent.quantity > 0);
    }

    #[test]
    fn close_below_prior_high_is_no_breakout() {
        // last close 124.5 vs prior 20-day high 126
        let inp = input(Regime::Bull, 0.8, strong_scores(), ascending(50));
        let intent = strategy().evaluate(&inp);
        assert_eq!(intent.action, TradeAction::Skip);
        assert!(intent.reason.contains("no breakout"), "{}", intent.reason);
    }

    #[test]
    fn weak_volume_is_skipped() {
        let mut bars = breaking_out();
        bars[49].volume = 120_000;
        let inp = input(Regime::Bull, 0.8, strong_scores(), bars);
        let intent = strategy().evaluate(&inp);
        assert_eq!(intent.action, TradeAction::Skip);
        assert!(intent.reason.contains("weak confirmation"), "{}", intent.reason);
    }

    #[test]
    fn failed_breakout_exits() {
        let inp = holding(input(Regime::Bull, 0.8, strong_scores(), ascending(50)), 130.0, 50);
        let intent = strategy().evaluate(&inp);
        assert_eq!(intent.action, TradeAction::Exit);
        assert_eq!(intent.quantity, 50);
        assert!(intent.reason.contains("failed breakout"));
    }

    #[test]
    fn holds_above_entry() {
        let inp = holding(input(Regime::Bull, 0.8, strong_scores(), ascending(50)), 120.0, 50);
        assert_eq!(strategy().evaluate(&inp).action, TradeAction::Hold);
    }
}
