//! Building blocks shared by the entry and exit chains.
//!
//! Entry filters return `Err(reason)` so a chain reads as a sequence of `?`.
//! Reasons always quote the observed value and the threshold it failed.

use super::EntrySetup;
use crate::domain::{Bar, Regime, RegimeClassification, StrategyInput};

/// Which regimes a policy is allowed to open positions in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegimeGate {
    BullOnly,
    NotBear,
}

pub fn require_regime(regime: &RegimeClassification, gate: RegimeGate) -> Result<(), String> {
    match (gate, regime.regime) {
        (RegimeGate::BullOnly, Regime::Bull) => Ok(()),
        (RegimeGate::BullOnly, other) => Err(format!("market regime is {other}, require BULL")),
        (RegimeGate::NotBear, Regime::Bear) => {
            Err("market regime is BEAR, no new long entries".to_string())
        }
        (RegimeGate::NotBear, _) => Ok(()),
    }
}

pub fn require_confidence(regime: &RegimeClassification, min: f64) -> Result<(), String> {
    if regime.confidence < min {
        return Err(format!(
            "regime confidence {:.2} < {:.2}",
            regime.confidence, min
        ));
    }
    Ok(())
}

/// `value >= min`, otherwise `"{label} {value} < {min}"`.
pub fn at_least(label: &str, value: f64, min: f64) -> Result<(), String> {
    if value < min {
        return Err(format!("{label} {value:.2} < {min:.2}"));
    }
    Ok(())
}

/// `value <= max`, otherwise `"{label} {value} > {max}"`.
pub fn at_most(label: &str, value: f64, max: f64) -> Result<(), String> {
    if value > max {
        return Err(format!("{label} {value:.2} > {max:.2}"));
    }
    Ok(())
}

/// Rank must be present and no worse than `max` (1 is best).
pub fn require_rank(rank: Option<u32>, max: u32) -> Result<(), String> {
    match rank {
        None => Err("rank unavailable".to_string()),
        Some(r) if r > max => Err(format!("rank {r} > {max}")),
        Some(_) => Ok(()),
    }
}

pub fn require_history(bars: &[Bar], min: usize) -> Result<(), String> {
    if bars.len() < min {
        return Err(format!("insufficient price history: {} < {}", bars.len(), min));
    }
    Ok(())
}

/// Latest close, the entry price of every policy.
pub fn latest_close(input: &StrategyInput) -> Result<f64, String> {
    input
        .last_close()
        .ok_or_else(|| "no price history".to_string())
}

/// Volume on the latest bar must reach `multiplier` × the prior average.
/// A zero average (no volume data) passes.
pub fn require_volume(latest: u64, average: f64, multiplier: f64) -> Result<(), String> {
    if average > 0.0 && (latest as f64) < average * multiplier {
        return Err(format!(
            "volume {latest} < {multiplier:.1}x average {average:.0} (weak confirmation)"
        ));
    }
    Ok(())
}

pub fn atr_stop(entry: f64, atr: f64, multiplier: f64) -> f64 {
    entry - atr * multiplier
}

/// entry + (entry - stop) × ratio
pub fn risk_reward_target(entry: f64, stop: f64, ratio: f64) -> f64 {
    entry + (entry - stop) * ratio
}

/// Final gate on every BUY: finite levels with stop < price < target.
pub fn sound_levels(setup: EntrySetup) -> Result<EntrySetup, String> {
    let EntrySetup {
        price,
        stop_loss,
        target,
        ..
    } = setup;
    let finite = price.is_finite() && stop_loss.is_finite() && target.is_finite();
    if !finite || stop_loss >= price || target <= price {
        return Err(format!(
            "degenerate trade levels: stop {stop_loss:.2}, price {price:.2}, target {target:.2}"
        ));
    }
    Ok(setup)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification(regime: Regime, confidence: f64) -> RegimeClassification {
        RegimeClassification::new(regime, confidence)
    }

    #[test]
    fn bull_only_gate() {
        assert!(require_regime(&classification(Regime::Bull, 0.9), RegimeGate::BullOnly).is_ok());
        let err = require_regime(&classification(Regime::Sideways, 0.9), RegimeGate::BullOnly)
            .unwrap_err();
        assert_eq!(err, "market regime is SIDEWAYS, require BULL");
    }

    #[test]
    fn not_bear_gate() {
        assert!(require_regime(&classification(Regime::Sideways, 0.9), RegimeGate::NotBear).is_ok());
        assert!(require_regime(&classification(Regime::Bear, 0.9), RegimeGate::NotBear).is_err());
    }

    #[test]
    fn threshold_reasons_quote_values() {
        assert_eq!(
            require_confidence(&classification(Regime::Bull, 0.55), 0.6).unwrap_err(),
            "regime confidence 0.55 < 0.60"
        );
        assert_eq!(
            at_least("trend strength", 0.4, 0.6).unwrap_err(),
            "trend strength 0.40 < 0.60"
        );
        assert_eq!(at_most("risk score", 0.7, 0.5).unwrap_err(), "risk score 0.70 > 0.50");
        assert!(at_least("x", 0.6, 0.6).is_ok());
        assert!(at_most("x", 0.5, 0.5).is_ok());
    }

    #[test]
    fn rank_rules() {
        assert!(require_rank(Some(3), 5).is_ok());
        assert_eq!(require_rank(Some(8), 5).unwrap_err(), "rank 8 > 5");
        assert_eq!(require_rank(None, 5).unwrap_err(), "rank unavailable");
    }

    #[test]
    fn history_rule() {
        assert_eq!(
            require_history(&[], 20).unwrap_err(),
            "insufficient price history: 0 < 20"
        );
    }

    #[test]
    fn volume_rule() {
        assert!(require_volume(150, 100.0, 1.5).is_ok());
        assert!(require_volume(149, 100.0, 1.5).is_err());
        assert!(require_volume(0, 0.0, 1.5).is_ok());
    }

    #[test]
    fn levels() {
        assert_eq!(atr_stop(100.0, 4.0, 2.0), 92.0);
        assert_eq!(risk_reward_target(100.0, 92.0, 2.5), 120.0);
    }

    #[test]
    fn sound_levels_rejects_inverted_and_nan() {
        let setup = |stop, target| EntrySetup {
            price: 100.0,
            stop_loss: stop,
            target,
            reason: String::new(),
        };
        assert!(sound_levels(setup(95.0, 110.0)).is_ok());
        assert!(sound_levels(setup(100.0, 110.0)).is_err());
        assert!(sound_levels(setup(95.0, 100.0)).is_err());
        assert!(sound_levels(setup(f64::NAN, 110.0)).is_err());
    }
}
