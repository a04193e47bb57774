//! Trend-following swing policy.
//!
//! Buys established uptrends in a BULL market when the scorer rates both the
//! trend and the breakout quality highly. Holds until the trend score fades.

use serde::{Deserialize, Serialize};

use super::rules::{
    at_least, at_most, atr_stop, latest_close, require_confidence, require_history,
    require_regime, risk_reward_target, RegimeGate,
};
use super::{decide, EntrySetup, Strategy};
use crate::config::{ensure_period, ensure_positive, ensure_unit, ConfigError};
use crate::domain::{StrategyInput, TradeIntent};
use crate::indicators::atr;
use crate::sizing::FixedFractionalSizer;

pub const ID: &str = "trend_follow_v1";
pub const NAME: &str = "Trend Following Swing";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrendFollowParams {
    pub min_regime_confidence: f64,
    pub min_trend_strength: f64,
    pub min_breakout_quality: f64,
    pub min_liquidity: f64,
    pub max_risk: f64,
    pub min_history: usize,
    pub atr_period: usize,
    pub atr_stop_multiplier: f64,
    pub risk_reward: f64,
    /// Exit once trend strength drops below this.
    pub exit_trend_below: f64,
}

impl Default for TrendFollowParams {
    fn default() -> Self {
        Self {
            min_regime_confidence: 0.6,
            min_trend_strength: 0.6,
            min_breakout_quality: 0.5,
            min_liquidity: 0.4,
            max_risk: 0.5,
            min_history: 20,
            atr_period: 14,
            atr_stop_multiplier: 2.0,
            risk_reward: 2.0,
            exit_trend_below: 0.3,
        }
    }
}

impl TrendFollowParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_unit("trend_follow.min_regime_confidence", self.min_regime_confidence)?;
        ensure_unit("trend_follow.min_trend_strength", self.min_trend_strength)?;
        ensure_unit("trend_follow.min_breakout_quality", self.min_breakout_quality)?;
        ensure_unit("trend_follow.min_liquidity", self.min_liquidity)?;
        ensure_unit("trend_follow.max_risk", self.max_risk)?;
        ensure_unit("trend_follow.exit_trend_below", self.exit_trend_below)?;
        ensure_period("trend_follow.min_history", self.min_history)?;
        ensure_period("trend_follow.atr_period", self.atr_period)?;
        ensure_positive("trend_follow.atr_stop_multiplier", self.atr_stop_multiplier)?;
        ensure_positive("trend_follow.risk_reward", self.risk_reward)
    }
}

#[derive(Debug, Clone)]
pub struct TrendFollow {
    params: TrendFollowParams,
    sizer: FixedFractionalSizer,
}

impl TrendFollow {
    pub fn new(params: TrendFollowParams, sizer: FixedFractionalSizer) -> Self {
        Self { params, sizer }
    }

    fn check_entry(&self, input: &StrategyInput) -> Result<EntrySetup, String> {
        let p = &self.params;
        let s = &input.scores;

        require_regime(&input.regime, RegimeGate::BullOnly)?;
        require_confidence(&input.regime, p.min_regime_confidence)?;
        at_least("trend strength", s.trend_strength, p.min_trend_strength)?;
        at_least("breakout quality", s.breakout_quality, p.min_breakout_quality)?;
        at_least("liquidity", s.liquidity, p.min_liquidity)?;
        at_most("risk score", s.risk, p.max_risk)?;
        require_history(&input.bars, p.min_history)?;

        let entry = latest_close(input)?;
        let atr = atr(&input.bars, p.atr_period);
        let stop_loss = atr_stop(entry, atr, p.atr_stop_multiplier);
        let target = risk_reward_target(entry, stop_loss, p.risk_reward);

        Ok(EntrySetup {
            price: entry,
            stop_loss,
            target,
            reason: format!(
                "uptrend confirmed: trend {:.2}, breakout {:.2}, ATR {:.2}",
                s.trend_strength, s.breakout_quality, atr
            ),
        })
    }

    fn check_exit(&self, input: &StrategyInput) -> Option<String> {
        let trend = input.scores.trend_strength;
        (trend < self.params.exit_trend_below).then(|| {
            format!(
                "trend strength {:.2} < {:.2} (trend weakening)",
                trend, self.params.exit_trend_below
            )
        })
    }
}

impl Strategy for TrendFollow {
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
            |_| self.check_exit(input),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Regime, TradeAction};
    use crate::strategies::test_support::*;

    fn strategy() -> TrendFollow {
        TrendFollow::new(TrendFollowParams::default(), FixedFractionalSizer::default())
    }

    fn bullish() -> StrategyInput {
        input(Regime::Bull, 0.8, scores(0.8, 0.7, 0.6, 0.3, 0.7), ascending(50))
    }

    #[test]
    fn buys_confirmed_uptrend() {
        let intent = strategy().evaluate(&bullish());
        assert_eq!(intent.action, TradeAction::Buy, "{}", intent.reason);
        assert_eq!(intent.price, 124.5);
        // ATR(14) = 4 → stop 124.5 - 8, target 124.5 + 16
        assert!((intent.stop_loss - 116.5).abs() < 1e-9);
        assert!((intent.target - 140.5).abs() < 1e-9);
        assert_eq!(intent.quantity, 625);
    }

    #[test]
    fn requires_bull_regime() {
        let mut inp = bullish();
        inp.regime.regime = Regime::Sideways;
        let intent = strategy().evaluate(&inp);
        assert_eq!(intent.action, TradeAction::Skip);
        assert_eq!(intent.reason, "market regime is SIDEWAYS, require BULL");
    }

    #[test]
    fn low_regime_confidence_skips() {
        let mut inp = bullish();
        inp.regime.confidence = 0.5;
        let intent = strategy().evaluate(&inp);
        assert_eq!(intent.action, TradeAction::Skip);
        assert_eq!(intent.reason, "regime confidence 0.50 < 0.60");
    }

    #[test]
    fn first_failing_filter_wins() {
        let mut inp = bullish();
        inp.scores.trend_strength = 0.5;
        inp.scores.risk = 0.9;
        let intent = strategy().evaluate(&inp);
        assert_eq!(intent.reason, "trend strength 0.50 < 0.60");
    }

    #[test]
    fn short_history_skips() {
        let inp = input(Regime::Bull, 0.8, scores(0.8, 0.7, 0.6, 0.3, 0.7), ascending(19));
        let intent = strategy().evaluate(&inp);
        assert_eq!(intent.action, TradeAction::Skip);
        assert_eq!(intent.reason, "insufficient price history: 19 < 20");
    }

    #[test]
    fn exits_when_trend_fades() {
        let mut inp = holding(bullish(), 120.0, 300);
        inp.scores.trend_strength = 0.2;
        let intent = strategy().evaluate(&inp);
        assert_eq!(intent.action, TradeAction::Exit);
        assert_eq!(intent.quantity, 300);
        assert!(intent.reason.contains("trend weakening"));
    }

    #[test]
    fn holds_while_trend_intact() {
        let intent = strategy().evaluate(&holding(bullish(), 120.0, 300));
        assert_eq!(intent.action, TradeAction::Hold);
    }

    #[test]
    fn params_validate() {
        assert!(TrendFollowParams::default().validate().is_ok());
        let bad = TrendFollowParams {
            atr_stop_multiplier: 0.0,
            ..TrendFollowParams::default()
        };
        assert!(bad.validate().is_err());
    }
}
