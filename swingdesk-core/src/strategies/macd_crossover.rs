//! MACD crossover policy.
//!
//! Buys the bar on which the MACD line crosses above its signal line with a
//! positive histogram. A crossover that already happened on an earlier bar is
//! stale and skipped.

use serde::{Deserialize, Serialize};

use super::rules::{
    at_least, at_most, atr_stop, latest_close, require_confidence, require_history,
    require_regime, risk_reward_target, RegimeGate,
};
use super::{decide, EntrySetup, Strategy};
use crate::config::{ensure_period, ensure_positive, ensure_unit, ConfigError};
use crate::domain::{StrategyInput, TradeIntent};
use crate::indicators::{atr, macd};
use crate::sizing::FixedFractionalSizer;

pub const ID: &str = "macd_crossover_v1";
pub const NAME: &str = "MACD Crossover";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MacdCrossoverParams {
    pub min_regime_confidence: f64,
    pub min_trend_strength: f64,
    pub min_liquidity: f64,
    pub max_risk: f64,
    pub min_history: usize,
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
    /// Skip entries whose MACD line is already above this.
    pub max_macd_for_entry: Option<f64>,
    pub atr_period: usize,
    pub atr_stop_multiplier: f64,
    pub risk_reward: f64,
    pub exit_trend_below: f64,
}

impl Default for MacdCrossoverParams {
    fn default() -> Self {
        Self {
            min_regime_confidence: 0.6,
            min_trend_strength: 0.4,
            min_liquidity: 0.4,
            max_risk: 0.5,
            min_history: 40,
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
            max_macd_for_entry: None,
            atr_period: 14,
            atr_stop_multiplier: 2.0,
            risk_reward: 2.0,
            exit_trend_below: 0.25,
        }
    }
}

impl MacdCrossoverParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_unit("macd_crossover.min_regime_confidence", self.min_regime_confidence)?;
        ensure_unit("macd_crossover.min_trend_strength", self.min_trend_strength)?;
        ensure_unit("macd_crossover.min_liquidity", self.min_liquidity)?;
        ensure_unit("macd_crossover.max_risk", self.max_risk)?;
        ensure_unit("macd_crossover.exit_trend_below", self.exit_trend_below)?;
        ensure_period("macd_crossover.min_history", self.min_history)?;
        ensure_period("macd_crossover.fast_period", self.fast_period)?;
        ensure_period("macd_crossover.slow_period", self.slow_period)?;
        ensure_period("macd_crossover.signal_period", self.signal_period)?;
        ensure_period("macd_crossover.atr_period", self.atr_period)?;
        if self.fast_period >= self.slow_period {
            return Err(ConfigError::Invalid {
                field: "macd_crossover.fast_period".to_string(),
                reason: format!(
                    "fast period {} must be below slow period {}",
                    self.fast_period, self.slow_period
                ),
            });
        }
        ensure_positive("macd_crossover.atr_stop_multiplier", self.atr_stop_multiplier)?;
        ensure_positive("macd_crossover.risk_reward", self.risk_reward)
    }

    /// Bars needed before the MACD signal line is defined.
    pub fn warmup(&self) -> usize {
        self.slow_period + self.signal_period
    }
}

#[derive(Debug, Clone)]
pub struct MacdCrossover {
    params: MacdCrossoverParams,
    sizer: FixedFractionalSizer,
}

impl MacdCrossover {
    pub fn new(params: MacdCrossoverParams, sizer: FixedFractionalSizer) -> Self {
        Self { params, sizer }
    }

    fn check_entry(&self, input: &StrategyInput) -> Result<EntrySetup, String> {
        let p = &self.params;
        let s = &input.scores;

        require_regime(&input.regime, RegimeGate::BullOnly)?;
        require_confidence(&input.regime, p.min_regime_confidence)?;
        at_least("trend strength", s.trend_strength, p.min_trend_strength)?;
        at_least("liquidity", s.liquidity, p.min_liquidity)?;
        at_most("risk score", s.risk, p.max_risk)?;
        require_history(&input.bars, p.min_history)?;

        let now = macd(&input.bars, p.fast_period, p.slow_period, p.signal_period);
        if now.line <= now.signal {
            return Err(format!(
                "MACD {:.4} <= signal {:.4} (no bullish crossover)",
                now.line, now.signal
            ));
        }

        let prev = macd(
            input.prior_bars(),
            p.fast_period,
            p.slow_period,
            p.signal_period,
        );
        if prev.line > prev.signal {
            return Err(format!(
                "MACD {:.4} was already above signal {:.4} on the prior bar (stale crossover)",
                prev.line, prev.signal
            ));
        }

        if now.histogram <= 0.0 {
            return Err(format!("MACD histogram {:.4} <= 0", now.histogram));
        }

        if let Some(max) = p.max_macd_for_entry {
            if now.line > max {
                return Err(format!(
                    "MACD {:.4} > {:.4} (overextended)",
                    now.line, max
                ));
            }
        }

        let close = latest_close(input)?;
        let stop_loss = atr_stop(close, atr(&input.bars, p.atr_period), p.atr_stop_multiplier);

        Ok(EntrySetup {
            price: close,
            stop_loss,
            target: risk_reward_target(close, stop_loss, p.risk_reward),
            reason: format!(
                "bullish MACD crossover: MACD {:.4} > signal {:.4}, histogram {:.4}",
                now.line, now.signal, now.histogram
            ),
        })
    }

    fn check_exit(&self, input: &StrategyInput) -> Option<String> {
        let p = &self.params;

        if input.bars.len() >= p.warmup() {
            let now = macd(&input.bars, p.fast_period, p.slow_period, p.signal_period);
            if now.line < now.signal {
                return Some(format!(
                    "MACD {:.4} crossed below signal {:.4}",
                    now.line, now.signal
                ));
            }
            if now.histogram < 0.0 {
                return Some(format!("MACD histogram {:.4} turned negative", now.histogram));
            }
        }

        let trend = input.scores.trend_strength;
        (trend < p.exit_trend_below).then(|| {
            format!(
                "trend strength {:.2} < {:.2}",
                trend, p.exit_trend_below
            )
        })
    }
}

impl Strategy for MacdCrossover {
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
