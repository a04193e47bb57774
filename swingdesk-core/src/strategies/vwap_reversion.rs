//! VWAP reversion policy.
//!
//! Buys a stretched, oversold dip below the rolling VWAP and targets the VWAP.
//! Filters on the volatility score so it stays out of disorderly tapes.

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
use crate::indicators::{atr, rsi, vwap};
use crate::sizing::FixedFractionalSizer;

pub const ID: &str = "vwap_reversion_v1";
pub const NAME: &str = "VWAP Reversion";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VwapReversionParams {
    pub min_regime_confidence: f64,
    pub min_liquidity: f64,
    pub max_risk: f64,
    pub max_volatility: f64,
    pub min_history: usize,
    pub vwap_period: usize,
    /// Minimum (vwap - close) / vwap, in percent.
    pub min_deviation_pct: f64,
    pub rsi_period: usize,
    pub rsi_max: f64,
    pub atr_period: usize,
    pub atr_stop_multiplier: f64,
    pub exit_rsi_above: f64,
    /// Overshoot above VWAP, in percent, reported as profit-taking.
    pub profit_overshoot_pct: f64,
}

impl Default for VwapReversionParams {
    fn default() -> Self {
        Self {
            min_regime_confidence: 0.5,
            min_liquidity: 0.5,
            max_risk: 0.5,
            max_volatility: 0.7,
            min_history: 30,
            vwap_period: 20,
            min_deviation_pct: 2.0,
            rsi_period: 14,
            rsi_max: 40.0,
            atr_period: 14,
            atr_stop_multiplier: 1.5,
            exit_rsi_above: 65.0,
            profit_overshoot_pct: 1.5,
        }
    }
}

impl VwapReversionParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_unit("vwap_reversion.min_regime_confidence", self.min_regime_confidence)?;
        ensure_unit("vwap_reversion.min_liquidity", self.min_liquidity)?;
        ensure_unit("vwap_reversion.max_risk", self.max_risk)?;
        ensure_unit("vwap_reversion.max_volatility", self.max_volatility)?;
        ensure_period("vwap_reversion.min_history", self.min_history)?;
        ensure_period("vwap_reversion.vwap_period", self.vwap_period)?;
        ensure_period("vwap_reversion.rsi_period", self.rsi_period)?;
        ensure_period("vwap_reversion.atr_period", self.atr_period)?;
        ensure_positive("vwap_reversion.min_deviation_pct", self.min_deviation_pct)?;
        ensure_positive("vwap_reversion.profit_overshoot_pct", self.profit_overshoot_pct)?;
        ensure_percent("vwap_reversion.rsi_max", self.rsi_max)?;
        ensure_percent("vwap_reversion.exit_rsi_above", self.exit_rsi_above)?;
        ensure_positive("vwap_reversion.atr_stop_multiplier", self.atr_stop_multiplier)
    }
}

#[derive(Debug, Clone)]
pub struct VwapReversion {
    params: VwapReversionParams,
    sizer: FixedFractionalSizer,
}

impl VwapReversion {
    pub fn new(params: VwapReversionParams, sizer: FixedFractionalSizer) -> Self {
        Self { params, sizer }
    }

    fn check_entry(&self, input: &StrategyInput) -> Result<EntrySetup, String> {
        let p = &self.params;
        let s = &input.scores;

        require_regime(&input.regime, RegimeGate::NotBear)?;
        require_confidence(&input.regime, p.min_regime_confidence)?;
        at_least("liquidity", s.liquidity, p.min_liquidity)?;
        at_most("risk score", s.risk, p.max_risk)?;
        at_most("volatility", s.volatility, p.max_volatility)?;
        require_history(&input.bars, p.min_history)?;

        let vwap = vwap(&input.bars, p.vwap_period);
        if vwap == 0.0 {
            return Err(format!("VWAP({}) unavailable (zero volume)", p.vwap_period));
        }

        let close = latest_close(input)?;
        let deviation_pct = (vwap - close) / vwap * 100.0;
        if deviation_pct < p.min_deviation_pct {
            return Err(format!(
                "price {:.2} is {:.2}% below VWAP {:.2} (min {:.2}%)",
                close, deviation_pct, vwap, p.min_deviation_pct
            ));
        }

        let rsi = rsi(&input.bars, p.rsi_period);
        if rsi >= p.rsi_max {
            return Err(format!("RSI {:.2} >= {:.2} (not oversold)", rsi, p.rsi_max));
        }

        let atr = atr(&input.bars, p.atr_period);
        Ok(EntrySetup {
            price: close,
            stop_loss: atr_stop(close, atr, p.atr_stop_multiplier),
            target: vwap,
            reason: format!(
                "price {:.2} is {:.2}% below VWAP {:.2}, RSI {:.2}",
                close, deviation_pct, vwap, rsi
            ),
        })
    }

    fn check_exit(&self, input: &StrategyInput) -> Option<String> {
        let p = &self.params;
        let close = input.last_close()?;

        if input.bars.len() >= p.vwap_period {
            let vwap = vwap(&input.bars, p.vwap_period);
            if vwap > 0.0 && close > vwap {
                let overshoot_pct = (close - vwap) / vwap * 100.0;
                if overshoot_pct >= p.profit_overshoot_pct {
                    return Some(format!(
                        "price {:.2} is {:.2}% above VWAP {:.2} (taking profit)",
                        close, overshoot_pct, vwap
                    ));
                }
                return Some(format!(
                    "price {:.2} reverted to VWAP {:.2}",
                    close, vwap
                ));
            }
        }

        if input.bars.len() > p.rsi_period {
            let rsi = rsi(&input.bars, p.rsi_period);
            if rsi > p.exit_rsi_above {
                return Some(format!(
                    "RSI {:.2} > {:.2} (overbought)",
                    rsi, p.exit_rsi_above
                ));
            }
        }

        None
    }
}

impl Strategy for VwapReversion {
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
