//! EMA pullback policy.
//!
//! Buys a dip to the fast EMA inside an uptrend defined by the slow EMA, with
//! RSI in a neutral band so the dip is neither a breakdown nor already extended.

use serde::{Deserialize, Serialize};

use super::rules::{
    at_least, at_most, atr_stop, latest_close, require_confidence, require_history,
    require_regime, risk_reward_target, RegimeGate,
};
use super::{decide, EntrySetup, Strategy};
use crate::config::{
    ensure_ordered, ensure_percent, ensure_period, ensure_positive, ensure_unit, ConfigError,
};
use crate::domain::{StrategyInput, TradeIntent};
use crate::indicators::{atr, ema, rsi};
use crate::sizing::FixedFractionalSizer;

pub const ID: &str = "pullback_v1";
pub const NAME: &str = "EMA Pullback";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PullbackParams {
    pub min_regime_confidence: f64,
    pub min_trend_strength: f64,
    pub min_liquidity: f64,
    pub max_risk: f64,
    pub min_history: usize,
    pub fast_ema: usize,
    pub slow_ema: usize,
    /// Maximum |close - fast EMA| as a percent of the fast EMA.
    pub max_distance_pct: f64,
    pub rsi_period: usize,
    pub rsi_min: f64,
    pub rsi_max: f64,
    pub atr_period: usize,
    pub atr_stop_multiplier: f64,
    pub risk_reward: f64,
    pub exit_trend_below: f64,
}

impl Default for PullbackParams {
    fn default() -> Self {
        Self {
            min_regime_confidence: 0.6,
            min_trend_strength: 0.5,
            min_liquidity: 0.4,
            max_risk: 0.5,
            min_history: 60,
            fast_ema: 20,
            slow_ema: 50,
            max_distance_pct: 1.0,
            rsi_period: 14,
            rsi_min: 40.0,
            rsi_max: 60.0,
            atr_period: 14,
            atr_stop_multiplier: 2.0,
            risk_reward: 2.5,
            exit_trend_below: 0.3,
        }
    }
}

impl PullbackParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_unit("pullback.min_regime_confidence", self.min_regime_confidence)?;
        ensure_unit("pullback.min_trend_strength", self.min_trend_strength)?;
        ensure_unit("pullback.min_liquidity", self.min_liquidity)?;
        ensure_unit("pullback.max_risk", self.max_risk)?;
        ensure_unit("pullback.exit_trend_below", self.exit_trend_below)?;
        ensure_period("pullback.min_history", self.min_history)?;
        ensure_period("pullback.fast_ema", self.fast_ema)?;
        ensure_period("pullback.slow_ema", self.slow_ema)?;
        ensure_period("pullback.rsi_period", self.rsi_period)?;
        ensure_period("pullback.atr_period", self.atr_period)?;
        ensure_positive("pullback.max_distance_pct", self.max_distance_pct)?;
        ensure_percent("pullback.rsi_min", self.rsi_min)?;
        ensure_percent("pullback.rsi_max", self.rsi_max)?;
        ensure_ordered("pullback.rsi_min", self.rsi_min, self.rsi_max)?;
        ensure_positive("pullback.atr_stop_multiplier", self.atr_stop_multiplier)?;
        ensure_positive("pullback.risk_reward", self.risk_reward)
    }
}

#[derive(Debug, Clone)]
pub struct Pullback {
    params: PullbackParams,
    sizer: FixedFractionalSizer,
}

impl Pullback {
    pub fn new(params: PullbackParams, sizer: FixedFractionalSizer) -> Self {
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

        let close = latest_close(input)?;
        let slow = ema(&input.bars, p.slow_ema);
        if slow <= 0.0 {
            return Err(format!("EMA({}) unavailable", p.slow_ema));
        }
        if close <= slow {
            return Err(format!(
                "price {:.2} <= EMA({}) {:.2} (not in uptrend)",
                close, p.slow_ema, slow
            ));
        }

        let fast = ema(&input.bars, p.fast_ema);
        if fast <= 0.0 {
            return Err(format!("EMA({}) unavailable", p.fast_ema));
        }
        let distance_pct = (close - fast).abs() / fast * 100.0;
        if distance_pct > p.max_distance_pct {
            return Err(format!(
                "price {:.2} is {:.2}% from EMA({}) {:.2} (max {:.2}%)",
                close, distance_pct, p.fast_ema, fast, p.max_distance_pct
            ));
        }

        let rsi = rsi(&input.bars, p.rsi_period);
        if rsi < p.rsi_min || rsi > p.rsi_max {
            return Err(format!(
                "RSI {:.2} outside {:.2}-{:.2} pullback band",
                rsi, p.rsi_min, p.rsi_max
            ));
        }

        let atr = atr(&input.bars, p.atr_period);
        let stop_loss = atr_stop(close, atr, p.atr_stop_multiplier);

        Ok(EntrySetup {
            price: close,
            stop_loss,
            target: risk_reward_target(close, stop_loss, p.risk_reward),
            reason: format!(
                "pullback to EMA({}) {:.2} ({:.2}% away) above EMA({}) {:.2}, RSI {:.2}",
                p.fast_ema, fast, distance_pct, p.slow_ema, slow, rsi
            ),
        })
    }

    fn check_exit(&self, input: &StrategyInput) -> Option<String> {
        let p = &self.params;

        if input.bars.len() >= p.slow_ema {
            let close = input.last_close()?;
            let slow = ema(&input.bars, p.slow_ema);
            if close < slow {
                return Some(format!(
                    "price {:.2} < EMA({}) {:.2} (uptrend broken)",
                    close, p.slow_ema, slow
                ));
            }
        }

        let trend = input.scores.trend_strength;
        (trend < p.exit_trend_below).then(|| {
            format!(
                "trend strength {:.2} < {:.2} (trend weakening)",
                trend, p.exit_trend_below
            )
        })
    }
}

impl Strategy for Pullback {
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
    use crate::domain::{Bar, Regime, TradeAction};
    use crate::strategies::test_support::*;

    fn strategy() -> Pullback {
        Pullback::new(PullbackParams::default(), FixedFractionalSizer::default())
    }

    /// 62 bars up 0.5/day, then 8 bars easing back 0.5/day to 126.5.
    fn dipping() -> Vec<Bar> {
        (0..70)
            .map(|i| {
                let p = if i < 62 {
                    100.0 + 0.5 * i as f64
                } else {
                    130.5 - (i - 61) as f64 * 0.5
                };
                bar(i, p - 1.0, p + 3.0, p - 2.0, p, 150_000)
            })
            .collect()
    }

    fn trending() -> crate::domain::ScoreBundle {
        scores(0.7, 0.5, 0.5, 0.3, 0.6)
    }

    #[test]
    fn buys_dip_to_fast_ema() {
        let inp = input(Regime::Bull, 0.8, trending(), dipping());
        let intent = strategy().evaluate(&inp);
        assert_eq!(intent.action, TradeAction::Buy, "{}", intent.reason);
        assert_eq!(intent.price, 126.5);
        assert!((intent.stop_loss - 116.5).abs() < 1e-9);
        assert!((intent.target - 151.5).abs() < 1e-9);
        assert_eq!(intent.quantity, 500);
    }

    #[test]
    fn extended_price_is_skipped() {
        // Steady uptrend: RSI pinned at 100 and price above the fast EMA
        let inp = input(Regime::Bull, 0.8, trending(), ascending(70));
        let intent = strategy().evaluate(&inp);
        assert_eq!(intent.action, TradeAction::Skip);
        assert!(
            intent.reason.contains("% from EMA(20)") || intent.reason.contains("pullback band"),
            "{}",
            intent.reason
        );
    }

    #[test]
    fn needs_sixty_bars() {
        let inp = input(Regime::Bull, 0.8, trending(), ascending(59));
        assert_eq!(
            strategy().evaluate(&inp).reason,
            "insufficient price history: 59 < 60"
        );
    }

    #[test]
    fn rsi_outside_band_is_skipped() {
        // The dip carries RSI 55.27; a 40-50 band rejects it.
        let params = PullbackParams {
            rsi_max: 50.0,
            ..PullbackParams::default()
        };
        let inp = input(Regime::Bull, 0.8, trending(), dipping());
        let intent = Pullback::new(params, FixedFractionalSizer::default()).evaluate(&inp);
        assert_eq!(intent.action, TradeAction::Skip);
        assert!(intent.reason.contains("outside 40.00-50.00 pullback band"), "{}", intent.reason);
    }

    #[test]
    fn exits_when_trend_weakens_above_slow_ema() {
        let mut inp = holding(input(Regime::Bull, 0.8, trending(), dipping()), 125.0, 20);
        inp.scores.trend_strength = 0.2;
        let intent = strategy().evaluate(&inp);
        assert_eq!(intent.action, TradeAction::Exit);
        assert!(intent.reason.contains("trend weakening"), "{}", intent.reason);
    }

    #[test]
    fn exits_below_slow_ema() {
        let bars: Vec<Bar> = (0..60)
            .map(|i| {
                let p = 150.0 - 0.5 * i as f64;
                bar(i, p + 1.0, p + 2.0, p - 2.0, p, 150_000)
            })
            .collect();
        let inp = holding(input(Regime::Bull, 0.8, trending(), bars), 140.0, 20);
        let intent = strategy().evaluate(&inp);
        assert_eq!(intent.action, TradeAction::Exit);
        assert!(intent.reason.contains("uptrend broken"));
    }

    #[test]
    fn rsi_band_must_be_ordered() {
        let bad = PullbackParams {
            rsi_min: 70.0,
            rsi_max: 30.0,
            ..PullbackParams::default()
        };
        assert!(bad.validate().is_err());
    }
}
