//! Bollinger Band squeeze policy.
//!
//! Waits for the bands to contract (low bandwidth on the bars before today),
//! then buys a volume-confirmed close above the upper band. The lower band is
//! the natural stop.

use serde::{Deserialize, Serialize};

use super::rules::{
    at_least, at_most, atr_stop, latest_close, require_confidence, require_history,
    require_regime, require_volume, risk_reward_target, RegimeGate,
};
use super::{decide, EntrySetup, Strategy};
use crate::config::{ensure_period, ensure_positive, ensure_unit, ConfigError};
use crate::domain::{StrategyInput, TradeIntent};
use crate::indicators::{atr, average_volume, bollinger};
use crate::sizing::FixedFractionalSizer;

pub const ID: &str = "bollinger_squeeze_v1";
pub const NAME: &str = "Bollinger Band Squeeze";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BollingerSqueezeParams {
    pub min_regime_confidence: f64,
    pub min_trend_strength: f64,
    pub min_liquidity: f64,
    pub max_risk: f64,
    pub min_history: usize,
    pub bb_period: usize,
    pub bb_std_dev: f64,
    /// Prior-bar bandwidth must not exceed this to count as a squeeze.
    pub squeeze_threshold: f64,
    pub volume_period: usize,
    pub volume_multiplier: f64,
    pub atr_period: usize,
    /// Fallback stop when the lower band is not below entry.
    pub atr_stop_multiplier: f64,
    pub risk_reward: f64,
    pub exit_trend_below: f64,
}

impl Default for BollingerSqueezeParams {
    fn default() -> Self {
        Self {
            min_regime_confidence: 0.5,
            min_trend_strength: 0.3,
            min_liquidity: 0.4,
            max_risk: 0.5,
            min_history: 30,
            bb_period: 20,
            bb_std_dev: 2.0,
            squeeze_threshold: 0.10,
            volume_period: 20,
            volume_multiplier: 1.2,
            atr_period: 14,
            atr_stop_multiplier: 1.5,
            risk_reward: 2.5,
            exit_trend_below: 0.2,
        }
    }
}

impl BollingerSqueezeParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_unit("bollinger_squeeze.min_regime_confidence", self.min_regime_confidence)?;
        ensure_unit("bollinger_squeeze.min_trend_strength", self.min_trend_strength)?;
        ensure_unit("bollinger_squeeze.min_liquidity", self.min_liquidity)?;
        ensure_unit("bollinger_squeeze.max_risk", self.max_risk)?;
        ensure_unit("bollinger_squeeze.exit_trend_below", self.exit_trend_below)?;
        ensure_period("bollinger_squeeze.min_history", self.min_history)?;
        ensure_period("bollinger_squeeze.bb_period", self.bb_period)?;
        ensure_period("bollinger_squeeze.volume_period", self.volume_period)?;
        ensure_period("bollinger_squeeze.atr_period", self.atr_period)?;
        ensure_positive("bollinger_squeeze.bb_std_dev", self.bb_std_dev)?;
        ensure_positive("bollinger_squeeze.squeeze_threshold", self.squeeze_threshold)?;
        ensure_positive("bollinger_squeeze.volume_multiplier", self.volume_multiplier)?;
        ensure_positive("bollinger_squeeze.atr_stop_multiplier", self.atr_stop_multiplier)?;
        ensure_positive("bollinger_squeeze.risk_reward", self.risk_reward)
    }
}

#[derive(Debug, Clone)]
pub struct BollingerSqueeze {
    params: BollingerSqueezeParams,
    sizer: FixedFractionalSizer,
}

impl BollingerSqueeze {
    pub fn new(params: BollingerSqueezeParams, sizer: FixedFractionalSizer) -> Self {
        Self { params, sizer }
    }

    fn check_entry(&self, input: &StrategyInput) -> Result<EntrySetup, String> {
        let p = &self.params;
        let s = &input.scores;

        require_regime(&input.regime, RegimeGate::NotBear)?;
        require_confidence(&input.regime, p.min_regime_confidence)?;
        at_least("trend strength", s.trend_strength, p.min_trend_strength)?;
        at_least("liquidity", s.liquidity, p.min_liquidity)?;
        at_most("risk score", s.risk, p.max_risk)?;
        require_history(&input.bars, p.min_history)?;

        let prior = input.prior_bars();
        let prior_bands = bollinger(prior, p.bb_period, p.bb_std_dev);
        if prior_bands.bandwidth == 0.0 {
            return Err("prior bandwidth unavailable".to_string());
        }
        if prior_bands.bandwidth > p.squeeze_threshold {
            return Err(format!(
                "prior bandwidth {:.4} > {:.4} (no squeeze)",
                prior_bands.bandwidth, p.squeeze_threshold
            ));
        }

        let bands = bollinger(&input.bars, p.bb_period, p.bb_std_dev);
        if bands.upper == 0.0 {
            return Err("Bollinger bands unavailable".to_string());
        }
        let close = latest_close(input)?;
        if close <= bands.upper {
            return Err(format!(
                "price {:.2} <= upper band {:.2} (no breakout)",
                close, bands.upper
            ));
        }

        let volume = input.last_bar().map_or(0, |b| b.volume);
        require_volume(
            volume,
            average_volume(prior, p.volume_period),
            p.volume_multiplier,
        )?;

        let stop_loss = if bands.lower > 0.0 && bands.lower < close {
            bands.lower
        } else {
            atr_stop(close, atr(&input.bars, p.atr_period), p.atr_stop_multiplier)
        };

        Ok(EntrySetup {
            price: close,
            stop_loss,
            target: risk_reward_target(close, stop_loss, p.risk_reward),
            reason: format!(
                "squeeze breakout: prior bandwidth {:.4}, price {:.2} > upper band {:.2}",
                prior_bands.bandwidth, close, bands.upper
            ),
        })
    }

    fn check_exit(&self, input: &StrategyInput) -> Option<String> {
        let p = &self.params;

        if input.bars.len() >= p.bb_period {
            let close = input.last_close()?;
            let bands = bollinger(&input.bars, p.bb_period, p.bb_std_dev);
            if bands.middle > 0.0 && close < bands.middle {
                return Some(format!(
                    "price {:.2} < middle band {:.2} (breakout failed)",
                    close, bands.middle
                ));
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

impl Strategy for BollingerSqueeze {
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
