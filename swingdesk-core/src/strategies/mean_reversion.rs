//! Mean-reversion swing policy.
//!
//! Buys oversold, non-trending stocks trading below their moving average and
//! targets the average itself. Avoids BEAR regimes but trades sideways markets.

use serde::{Deserialize, Serialize};

use super::rules::{
    at_least, at_most, atr_stop, latest_close, require_confidence, require_history,
    require_regime, RegimeGate,
};
use super::{decide, EntrySetup, Strategy};
use crate::config::{
    ensure_percent, ensure_period, ensure_positive, ensure_unit, ConfigError,
};
use crate::domain::{StrategyInput, TradeIntent};
use crate::indicators::{atr, rsi, sma};
use crate::sizing::FixedFractionalSizer;

pub const ID: &str = "mean_reversion_v1";
pub const NAME: &str = "Mean Reversion Swing";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeanReversionParams {
    pub min_regime_confidence: f64,
    /// Entry requires trend strength strictly below this.
    pub max_trend_strength: f64,
    pub max_risk: f64,
    pub min_liquidity: f64,
    pub min_history: usize,
    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub sma_period: usize,
    pub atr_period: usize,
    pub atr_stop_multiplier: f64,
    pub exit_rsi_overbought: f64,
    pub exit_trend_above: f64,
}

impl Default for MeanReversionParams {
    fn default() -> Self {
        Self {
            min_regime_confidence: 0.5,
            max_trend_strength: 0.4,
            max_risk: 0.6,
            min_liquidity: 0.4,
            min_history: 30,
            rsi_period: 14,
            rsi_oversold: 35.0,
            sma_period: 20,
            atr_period: 14,
            atr_stop_multiplier: 1.5,
            exit_rsi_overbought: 65.0,
            exit_trend_above: 0.7,
        }
    }
}

impl MeanReversionParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_unit("mean_reversion.min_regime_confidence", self.min_regime_confidence)?;
        ensure_unit("mean_reversion.max_trend_strength", self.max_trend_strength)?;
        ensure_unit("mean_reversion.max_risk", self.max_risk)?;
        ensure_unit("mean_reversion.min_liquidity", self.min_liquidity)?;
        ensure_unit("mean_reversion.exit_trend_above", self.exit_trend_above)?;
        ensure_period("mean_reversion.min_history", self.min_history)?;
        ensure_period("mean_reversion.rsi_period", self.rsi_period)?;
        ensure_period("mean_reversion.sma_period", self.sma_period)?;
        ensure_period("mean_reversion.atr_period", self.atr_period)?;
        ensure_percent("mean_reversion.rsi_oversold", self.rsi_oversold)?;
        ensure_percent("mean_reversion.exit_rsi_overbought", self.exit_rsi_overbought)?;
        ensure_positive("mean_reversion.atr_stop_multiplier", self.atr_stop_multiplier)
    }
}

#[derive(Debug, Clone)]
pub struct MeanReversion {
    params: MeanReversionParams,
    sizer: FixedFractionalSizer,
}

impl MeanReversion {
    pub fn new(params: MeanReversionParams, sizer: FixedFractionalSizer) -> Self {
        Self { params, sizer }
    }

    fn check_entry(&self, input: &StrategyInput) -> Result<EntrySetup, String> {
        let p = &self.params;
        let s = &input.scores;

        require_regime(&input.regime, RegimeGate::NotBear)?;
        require_confidence(&input.regime, p.min_regime_confidence)?;
        if s.trend_strength >= p.max_trend_strength {
            return Err(format!(
                "trend strength {:.2} >= {:.2} (stock is trending, not mean-reverting)",
                s.trend_strength, p.max_trend_strength
            ));
        }
        at_most("risk score", s.risk, p.max_risk)?;
        at_least("liquidity", s.liquidity, p.min_liquidity)?;
        require_history(&input.bars, p.min_history)?;

        let close = latest_close(input)?;
        let rsi = rsi(&input.bars, p.rsi_period);
        if rsi >= p.rsi_oversold {
            return Err(format!(
                "RSI {:.2} >= {:.2} (not oversold)",
                rsi, p.rsi_oversold
            ));
        }

        let mean = sma(&input.bars, p.sma_period);
        if mean <= 0.0 {
            return Err(format!("SMA({}) unavailable", p.sma_period));
        }
        if close >= mean {
            return Err(format!(
                "price {:.2} >= SMA({}) {:.2} (not below mean)",
                close, p.sma_period, mean
            ));
        }

        let atr = atr(&input.bars, p.atr_period);
        Ok(EntrySetup {
            price: close,
            stop_loss: atr_stop(close, atr, p.atr_stop_multiplier),
            target: mean,
            reason: format!(
                "oversold: RSI {:.2}, price {:.2} below SMA({}) {:.2}",
                rsi, close, p.sma_period, mean
            ),
        })
    }

    fn check_exit(&self, input: &StrategyInput) -> Option<String> {
        let p = &self.params;

        if input.bars.len() >= p.sma_period {
            let close = input.last_close()?;
            let mean = sma(&input.bars, p.sma_period);
            if mean > 0.0 && close > mean {
                return Some(format!(
                    "price {:.2} reverted above SMA({}) {:.2}",
                    close, p.sma_period, mean
                ));
            }
        }

        if input.bars.len() > p.rsi_period {
            let rsi = rsi(&input.bars, p.rsi_period);
            if rsi > p.exit_rsi_overbought {
                return Some(format!(
                    "RSI {:.2} > {:.2} (overbought)",
                    rsi, p.exit_rsi_overbought
                ));
            }
        }

        let trend = input.scores.trend_strength;
        (trend > p.exit_trend_above).then(|| {
            format!(
                "trend strength {:.2} > {:.2} (trend emerging, reversion thesis invalid)",
                trend, p.exit_trend_above
            )
        })
    }
}

impl Strategy for MeanReversion {
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
