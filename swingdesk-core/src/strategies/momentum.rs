//! Momentum swing policy.
//!
//! Buys only the top-ranked names with strong trend, breakout and rate of
//! change. Strictest score filters of the nine policies.

use serde::{Deserialize, Serialize};

use super::rules::{
    at_least, at_most, atr_stop, latest_close, require_confidence, require_history,
    require_rank, require_regime, risk_reward_target, RegimeGate,
};
use super::{decide, EntrySetup, Strategy};
use crate::config::{ensure_period, ensure_positive, ensure_unit, ConfigError};
use crate::domain::{StrategyInput, TradeIntent};
use crate::indicators::{atr, roc};
use crate::sizing::FixedFractionalSizer;

pub const ID: &str = "momentum_v1";
pub const NAME: &str = "Momentum Swing";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MomentumParams {
    pub min_regime_confidence: f64,
    /// Entry requires rank <= this (1 is best).
    pub max_rank: u32,
    pub min_trend_strength: f64,
    pub min_breakout_quality: f64,
    pub min_liquidity: f64,
    pub max_risk: f64,
    pub min_history: usize,
    pub roc_period: usize,
    /// Minimum ROC as a fraction (0.05 = 5%).
    pub min_roc: f64,
    pub atr_period: usize,
    pub atr_stop_multiplier: f64,
    pub risk_reward: f64,
    pub exit_rank_above: u32,
    pub exit_trend_below: f64,
}

impl Default for MomentumParams {
    fn default() -> Self {
        Self {
            min_regime_confidence: 0.7,
            max_rank: 5,
            min_trend_strength: 0.7,
            min_breakout_quality: 0.6,
            min_liquidity: 0.6,
            max_risk: 0.3,
            min_history: 30,
            roc_period: 10,
            min_roc: 0.05,
            atr_period: 14,
            atr_stop_multiplier: 2.5,
            risk_reward: 2.5,
            exit_rank_above: 10,
            exit_trend_below: 0.5,
        }
    }
}

impl MomentumParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_unit("momentum.min_regime_confidence", self.min_regime_confidence)?;
        ensure_unit("momentum.min_trend_strength", self.min_trend_strength)?;
        ensure_unit("momentum.min_breakout_quality", self.min_breakout_quality)?;
        ensure_unit("momentum.min_liquidity", self.min_liquidity)?;
        ensure_unit("momentum.max_risk", self.max_risk)?;
        ensure_unit("momentum.exit_trend_below", self.exit_trend_below)?;
        ensure_period("momentum.max_rank", self.max_rank as usize)?;
        ensure_period("momentum.exit_rank_above", self.exit_rank_above as usize)?;
        ensure_period("momentum.min_history", self.min_history)?;
        ensure_period("momentum.roc_period", self.roc_period)?;
        ensure_period("momentum.atr_period", self.atr_period)?;
        ensure_positive("momentum.atr_stop_multiplier", self.atr_stop_multiplier)?;
        ensure_positive("momentum.risk_reward", self.risk_reward)
    }
}

#[derive(Debug, Clone)]
pub struct Momentum {
    params: MomentumParams,
    sizer: FixedFractionalSizer,
}

impl Momentum {
    pub fn new(params: MomentumParams, sizer: FixedFractionalSizer) -> Self {
        Self { params, sizer }
    }

    fn check_entry(&self, input: &StrategyInput) -> Result<EntrySetup, String> {
        let p = &self.params;
        let s = &input.scores;

        require_regime(&input.regime, RegimeGate::BullOnly)?;
        require_confidence(&input.regime, p.min_regime_confidence)?;
        require_rank(s.rank, p.max_rank)?;
        at_least("trend strength", s.trend_strength, p.min_trend_strength)?;
        at_least("breakout quality", s.breakout_quality, p.min_breakout_quality)?;
        at_least("liquidity", s.liquidity, p.min_liquidity)?;
        at_most("risk score", s.risk, p.max_risk)?;
        require_history(&input.bars, p.min_history)?;

        let roc = roc(&input.bars, p.roc_period);
        if roc < p.min_roc {
            return Err(format!(
                "ROC({}) {:.2}% < {:.2}% (insufficient momentum)",
                p.roc_period,
                roc * 100.0,
                p.min_roc * 100.0
            ));
        }

        let close = latest_close(input)?;
        let atr = atr(&input.bars, p.atr_period);
        let stop_loss = atr_stop(close, atr, p.atr_stop_multiplier);

        Ok(EntrySetup {
            price: close,
            stop_loss,
            target: risk_reward_target(close, stop_loss, p.risk_reward),
            reason: format!(
                "momentum: rank {}, ROC({}) {:.2}%, trend {:.2}",
                s.rank.unwrap_or_default(),
                p.roc_period,
                roc * 100.0,
                s.trend_strength
            ),
        })
    }

    fn check_exit(&self, input: &StrategyInput) -> Option<String> {
        let p = &self.params;
        let s = &input.scores;

        if input.bars.len() > p.roc_period {
            let roc = roc(&input.bars, p.roc_period);
            if roc < 0.0 {
                return Some(format!(
                    "ROC({}) {:.2}% turned negative",
                    p.roc_period,
                    roc * 100.0
                ));
            }
        }

        if let Some(rank) = s.rank {
            if rank > p.exit_rank_above {
                return Some(format!(
                    "rank {} > {} (dropped out of leaders)",
                    rank, p.exit_rank_above
                ));
            }
        }

        (s.trend_strength < p.exit_trend_below).then(|| {
            format!(
                "trend strength {:.2} < {:.2} (momentum fading)",
                s.trend_strength, p.exit_trend_below
            )
        })
    }
}

impl Strategy for Momentum {
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
