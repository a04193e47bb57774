//! Opening-range breakout policy, adapted to daily bars.
//!
//! The "range" is the last N completed bars. A setup needs volatility
//! compression first (short ATR well below long ATR on those bars), then a
//! volume-confirmed close above the range high. The range low is the stop.

use serde::{Deserialize, Serialize};

use super::rules::{
    at_least, at_most, atr_stop, latest_close, require_confidence, require_history,
    require_regime, require_volume, risk_reward_target, RegimeGate,
};
use super::{decide, EntrySetup, Strategy};
use crate::config::{ensure_period, ensure_positive, ensure_unit, ConfigError};
use crate::domain::{PositionSnapshot, StrategyInput, TradeIntent};
use crate::indicators::{atr, average_volume, highest_high, lowest_low};
use crate::sizing::FixedFractionalSizer;

pub const ID: &str = "orb_v1";
pub const NAME: &str = "Opening Range Breakout";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrbParams {
    pub min_regime_confidence: f64,
    pub min_trend_strength: f64,
    pub min_breakout_quality: f64,
    pub min_liquidity: f64,
    pub max_risk: f64,
    pub min_history: usize,
    pub range_period: usize,
    pub short_atr_period: usize,
    pub long_atr_period: usize,
    /// Short ATR / long ATR must not exceed this.
    pub max_compression_ratio: f64,
    pub volume_multiplier: f64,
    pub atr_period: usize,
    /// Fallback stop when the range low is not below entry.
    pub atr_stop_multiplier: f64,
    pub risk_reward: f64,
    pub exit_trend_below: f64,
}

impl Default for OrbParams {
    fn default() -> Self {
        Self {
            min_regime_confidence: 0.6,
            min_trend_strength: 0.5,
            min_breakout_quality: 0.6,
            min_liquidity: 0.5,
            max_risk: 0.4,
            min_history: 30,
            range_period: 10,
            short_atr_period: 5,
            long_atr_period: 20,
            max_compression_ratio: 0.6,
            volume_multiplier: 1.5,
            atr_period: 14,
            atr_stop_multiplier: 1.0,
            risk_reward: 2.0,
            exit_trend_below: 0.3,
        }
    }
}

impl OrbParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_unit("orb.min_regime_confidence", self.min_regime_confidence)?;
        ensure_unit("orb.min_trend_strength", self.min_trend_strength)?;
        ensure_unit("orb.min_breakout_quality", self.min_breakout_quality)?;
        ensure_unit("orb.min_liquidity", self.min_liquidity)?;
        ensure_unit("orb.max_risk", self.max_risk)?;
        ensure_unit("orb.exit_trend_below", self.exit_trend_below)?;
        ensure_period("orb.min_history", self.min_history)?;
        ensure_period("orb.range_period", self.range_period)?;
        ensure_period("orb.short_atr_period", self.short_atr_period)?;
        ensure_period("orb.long_atr_period", self.long_atr_period)?;
        ensure_period("orb.atr_period", self.atr_period)?;
        ensure_positive("orb.max_compression_ratio", self.max_compression_ratio)?;
        ensure_positive("orb.volume_multiplier", self.volume_multiplier)?;
        ensure_positive("orb.atr_stop_multiplier", self.atr_stop_multiplier)?;
        ensure_positive("orb.risk_reward", self.risk_reward)
    }
}

#[derive(Debug, Clone)]
pub struct OpeningRangeBreakout {
    params: OrbParams,
    sizer: FixedFractionalSizer,
}

impl OpeningRangeBreakout {
    pub fn new(params: OrbParams, sizer: FixedFractionalSizer) -> Self {
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

        let prior = input.prior_bars();
        let long_atr = atr(prior, p.long_atr_period);
        if long_atr <= 0.0 {
            return Err(format!("ATR({}) unavailable", p.long_atr_period));
        }
        let ratio = atr(prior, p.short_atr_period) / long_atr;
        if ratio > p.max_compression_ratio {
            return Err(format!(
                "ATR ratio {:.2} > {:.2} (no volatility compression)",
                ratio, p.max_compression_ratio
            ));
        }

        let close = latest_close(input)?;
        let range_high = highest_high(prior, p.range_period);
        if close <= range_high {
            return Err(format!(
                "price {:.2} <= {}-day range high {:.2} (no breakout)",
                close, p.range_period, range_high
            ));
        }

        let volume = input.last_bar().map_or(0, |b| b.volume);
        require_volume(
            volume,
            average_volume(prior, p.range_period),
            p.volume_multiplier,
        )?;

        let range_low = lowest_low(prior, p.range_period);
        let stop_loss = if range_low > 0.0 && range_low < close {
            range_low
        } else {
            atr_stop(close, atr(&input.bars, p.atr_period), p.atr_stop_multiplier)
        };

        Ok(EntrySetup {
            price: close,
            stop_loss,
            target: risk_reward_target(close, stop_loss, p.risk_reward),
            reason: format!(
                "range breakout: price {:.2} > {}-day high {:.2} after compression (ATR ratio {:.2})",
                close, p.range_period, range_high, ratio
            ),
        })
    }

    fn check_exit(&self, input: &StrategyInput, position: &PositionSnapshot) -> Option<String> {
        let p = &self.params;
        let trend = input.scores.trend_strength;
        if trend < p.exit_trend_below {
            return Some(format!(
                "trend strength {:.2} < {:.2}",
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

impl Strategy for OpeningRangeBreakout {
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
