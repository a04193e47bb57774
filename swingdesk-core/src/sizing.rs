//! Fixed-fractional position sizing.
//!
//! One routine, shared by every policy: risk a fixed percentage of available
//! capital between entry and stop, then clip to what the capital can buy.

use serde::{Deserialize, Serialize};

/// Why a position could not be sized. The `Display` text becomes the SKIP reason.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SizingError {
    #[error("invalid sizing inputs: entry={entry:.2} stop={stop:.2} capital={capital:.2}")]
    InvalidInputs { entry: f64, stop: f64, capital: f64 },
    #[error("risk per share {risk_per_share:.2} is not positive (entry {entry:.2}, stop {stop:.2})")]
    NonPositiveRisk {
        risk_per_share: f64,
        entry: f64,
        stop: f64,
    },
    #[error("calculated quantity is zero (risk per share too large)")]
    ZeroQuantity,
    #[error("insufficient capital for minimum position")]
    InsufficientCapital,
}

/// Fixed-fractional risk sizer.
///
/// # Formula
/// ```text
/// risk_per_share = entry - stop              (must be > 0 for a long)
/// max_risk       = capital * max_risk_pct / 100
/// quantity       = floor(max_risk / risk_per_share)
/// if quantity * entry > capital:
///     quantity   = floor(capital / entry)
/// ```
///
/// # Example
/// - Capital: $500,000, risk 1% ($5,000)
/// - Entry $124.50, stop $116.50 → $8.00 risk per share
/// - Quantity: floor($5,000 / $8.00) = 625 shares ($77,812.50 notional)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedFractionalSizer {
    /// Percent of available capital risked per trade, in (0, 100].
    pub max_risk_per_trade_pct: f64,
}

impl Default for FixedFractionalSizer {
    fn default() -> Self {
        Self {
            max_risk_per_trade_pct: 1.0,
        }
    }
}

impl FixedFractionalSizer {
    pub fn new(max_risk_per_trade_pct: f64) -> Self {
        Self {
            max_risk_per_trade_pct,
        }
    }

    /// Whole-share quantity for a long entry. Never returns zero: a position
    /// that rounds down to nothing is an error.
    pub fn size(&self, entry: f64, stop: f64, available_capital: f64) -> Result<u64, SizingError> {
        if !entry.is_finite() || !stop.is_finite() || !available_capital.is_finite() || entry <= 0.0
        {
            return Err(SizingError::InvalidInputs {
                entry,
                stop,
                capital: available_capital,
            });
        }

        let risk_per_share = entry - stop;
        if risk_per_share <= 0.0 {
            return Err(SizingError::NonPositiveRisk {
                risk_per_share,
                entry,
                stop,
            });
        }

        let max_risk = available_capital * (self.max_risk_per_trade_pct / 100.0);
        let mut quantity = (max_risk / risk_per_share).floor();
        if quantity <= 0.0 {
            return Err(SizingError::ZeroQuantity);
        }

        if quantity * entry > available_capital {
            quantity = (available_capital / entry).floor();
            if quantity <= 0.0 {
                return Err(SizingError::InsufficientCapital);
            }
        }

        Ok(quantity as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_based_quantity_is_floored() {
        let sizer = FixedFractionalSizer::new(1.0);
        assert_eq!(sizer.size(124.5, 116.5, 500_000.0), Ok(625));
        // 5000 / 7 = 714.28 → 714
        assert_eq!(sizer.size(100.0, 93.0, 500_000.0), Ok(714));
    }

    #[test]
    fn capital_clip() {
        // 100 / 0.5 = 200 shares = $20,000 > $10,000 → floor(10,000 / 100) = 100
        let sizer = FixedFractionalSizer::new(1.0);
        assert_eq!(sizer.size(100.0, 99.5, 10_000.0), Ok(100));
    }

    #[test]
    fn stop_at_or_above_entry_is_rejected() {
        let sizer = FixedFractionalSizer::default();
        assert!(matches!(
            sizer.size(100.0, 100.0, 50_000.0),
            Err(SizingError::NonPositiveRisk { .. })
        ));
        assert!(matches!(
            sizer.size(100.0, 105.0, 50_000.0),
            Err(SizingError::NonPositiveRisk { .. })
        ));
    }

    #[test]
    fn zero_quantity_reason() {
        // max risk $10, risk per share $50
        let err = FixedFractionalSizer::new(1.0)
            .size(100.0, 50.0, 1_000.0)
            .unwrap_err();
        assert_eq!(err, SizingError::ZeroQuantity);
        assert_eq!(
            err.to_string(),
            "calculated quantity is zero (risk per share too large)"
        );
    }

    #[test]
    fn insufficient_capital_reason() {
        // max risk $1 / $0.50 = 2 shares = $1,000 > $100 → floor(0.2) = 0
        let err = FixedFractionalSizer::new(1.0)
            .size(500.0, 499.5, 100.0)
            .unwrap_err();
        assert_eq!(err, SizingError::InsufficientCapital);
        assert_eq!(err.to_string(), "insufficient capital for minimum position");
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        let sizer = FixedFractionalSizer::default();
        assert!(matches!(
            sizer.size(f64::NAN, 90.0, 10_000.0),
            Err(SizingError::InvalidInputs { .. })
        ));
        assert!(matches!(
            sizer.size(100.0, f64::NEG_INFINITY, 10_000.0),
            Err(SizingError::InvalidInputs { .. })
        ));
        assert!(matches!(
            sizer.size(0.0, -1.0, 10_000.0),
            Err(SizingError::InvalidInputs { .. })
        ));
    }

    #[test]
    fn no_capital_means_zero_quantity() {
        let sizer = FixedFractionalSizer::default();
        assert_eq!(sizer.size(100.0, 90.0, 0.0), Err(SizingError::ZeroQuantity));
    }
}
