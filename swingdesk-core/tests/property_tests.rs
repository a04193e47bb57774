//! Property-based tests for the decision core.
//!
//! Properties verified:
//! 1. Determinism: the same input always yields the same intent.
//! 2. Long-only soundness: every BUY has stop < price < target, a positive
//!    quantity, and notional within available capital.
//! 3. Full exits: an EXIT closes the whole held quantity.
//! 4. BEAR circuit breaker: every policy exits a held position in BEAR.
//! 5. Short history: entries SKIP citing insufficient history.
//! 6. Indicator bounds: RSI in [0, 100], ATR falls back to the last range.

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use swingdesk_core::domain::{
    Bar, PositionSnapshot, Regime, RegimeClassification, ScoreBundle, StrategyInput, TradeAction,
};
use swingdesk_core::indicators::{atr, rsi};
use swingdesk_core::strategies::{create_strategy, ALL_STRATEGY_IDS};
use swingdesk_core::{Strategy as Policy, SwingConfig};

// ── Strategies (proptest generators) ─────────────────────────────────

/// Random-walk bars that always satisfy low <= open,close <= high.
fn arb_bars(min: usize, max: usize) -> impl Strategy<Value = Vec<Bar>> {
    (
        50.0..150.0f64,
        prop::collection::vec((-0.03..0.03f64, 0.0..0.02f64, 0.0..0.02f64, 1_000u64..1_000_000), min..max),
    )
        .prop_map(|(start, steps)| {
            let mut prev = start;
            steps
                .into_iter()
                .enumerate()
                .map(|(i, (ret, up, down, volume))| {
                    let open = prev;
                    let close = (prev * (1.0 + ret)).max(1.0);
                    let high = open.max(close) * (1.0 + up);
                    let low = open.min(close) * (1.0 - down);
                    prev = close;
                    Bar {
                        symbol: "PROP".into(),
                        date: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
                            + chrono::Duration::days(i as i64),
                        open,
                        high,
                        low,
                        close,
                        volume,
                    }
                })
                .collect()
        })
}

fn arb_regime() -> impl Strategy<Value = RegimeClassification> {
    (
        prop_oneof![Just(Regime::Bull), Just(Regime::Sideways), Just(Regime::Bear)],
        0.0..=1.0f64,
    )
        .prop_map(|(regime, confidence)| RegimeClassification::new(regime, confidence))
}

fn arb_scores() -> impl Strategy<Value = ScoreBundle> {
    (
        0.0..=1.0f64,
        0.0..=1.0f64,
        0.0..=1.0f64,
        0.0..=1.0f64,
        0.0..=1.0f64,
        prop::option::of(1u32..50),
    )
        .prop_map(|(trend, breakout, volatility, risk, liquidity, rank)| ScoreBundle {
            symbol: "PROP".into(),
            trend_strength: trend,
            breakout_quality: breakout,
            volatility,
            risk,
            liquidity,
            composite: None,
            rank,
        })
}

fn arb_input() -> impl Strategy<Value = StrategyInput> {
    (arb_regime(), arb_scores(), arb_bars(0, 90), 0.0..1_000_000.0f64).prop_map(
        |(regime, scores, bars, capital)| StrategyInput {
            date: NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
            regime,
            scores,
            bars,
            position: None,
            open_positions: 0,
            available_capital: capital,
        },
    )
}

// ── Helpers ──────────────────────────────────────────────────────────

fn all_policies() -> Vec<Box<dyn Policy>> {
    let config = SwingConfig::default();
    ALL_STRATEGY_IDS
        .iter()
        .map(|id| create_strategy(id, &config).unwrap())
        .collect()
}

fn position(entry: f64, quantity: u64) -> PositionSnapshot {
    PositionSnapshot {
        symbol: "PROP".into(),
        entry_price: entry,
        quantity,
        stop_loss: entry * 0.9,
        target: entry * 1.2,
        entry_time: Utc.with_ymd_and_hms(2023, 6, 1, 14, 30, 0).unwrap(),
        strategy_id: "trend_follow_v1".into(),
        signal_id: "trend_follow_v1-PROP-2023-06-01".into(),
    }
}

// ── Properties ───────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn evaluation_is_deterministic(input in arb_input()) {
        for policy in all_policies() {
            let a = policy.evaluate(&input);
            let b = policy.evaluate(&input);
            prop_assert_eq!(a.fingerprint(), b.fingerprint());
            prop_assert_eq!(a, b);
        }
    }

    #[test]
    fn buys_are_long_only_and_affordable(input in arb_input()) {
        for policy in all_policies() {
            let intent = policy.evaluate(&input);
            prop_assert!(!intent.reason.is_empty());
            prop_assert_eq!(intent.strategy_id.as_str(), policy.id());
            if intent.action == TradeAction::Buy {
                prop_assert!(intent.stop_loss < intent.price, "{}: {}", policy.id(), intent.reason);
                prop_assert!(intent.price < intent.target, "{}: {}", policy.id(), intent.reason);
                prop_assert!(intent.quantity > 0);
                prop_assert!(intent.quantity as f64 * intent.price <= input.available_capital + 1e-6);
            } else {
                prop_assert_eq!(intent.action, TradeAction::Skip);
                prop_assert_eq!(intent.quantity, 0);
            }
        }
    }

    #[test]
    fn held_positions_exit_in_full_or_hold(
        mut input in arb_input(),
        quantity in 1u64..10_000,
    ) {
        prop_assume!(!input.bars.is_empty());
        let entry = input.bars[0].close;
        input.position = Some(position(entry, quantity));
        for policy in all_policies() {
            let intent = policy.evaluate(&input);
            match intent.action {
                TradeAction::Exit => prop_assert_eq!(intent.quantity, quantity),
                TradeAction::Hold => prop_assert_eq!(intent.quantity, 0),
                other => prop_assert!(false, "{} returned {} with a position", policy.id(), other),
            }
        }
    }

    #[test]
    fn bear_regime_exits_every_policy(
        mut input in arb_input(),
        confidence in 0.0..=1.0f64,
        quantity in 1u64..10_000,
    ) {
        prop_assume!(!input.bars.is_empty());
        input.regime = RegimeClassification::new(Regime::Bear, confidence);
        input.position = Some(position(input.bars[0].close, quantity));
        for policy in all_policies() {
            let intent = policy.evaluate(&input);
            prop_assert_eq!(intent.action, TradeAction::Exit, "{}", policy.id());
            prop_assert_eq!(intent.quantity, quantity);
        }
    }

    #[test]
    fn short_history_skips_entries(bars in arb_bars(0, 20)) {
        for policy in all_policies() {
            let trend = if policy.id() == "mean_reversion_v1" { 0.2 } else { 0.8 };
            let input = StrategyInput {
                date: NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
                regime: RegimeClassification::new(Regime::Bull, 0.9),
                scores: ScoreBundle {
                    symbol: "PROP".into(),
                    trend_strength: trend,
                    breakout_quality: 0.8,
                    volatility: 0.5,
                    risk: 0.2,
                    liquidity: 0.8,
                    composite: None,
                    rank: Some(1),
                },
                bars: bars.clone(),
                position: None,
                open_positions: 0,
                available_capital: 100_000.0,
            };
            let intent = policy.evaluate(&input);
            prop_assert_eq!(intent.action, TradeAction::Skip);
            prop_assert!(
                intent.reason.starts_with("insufficient price history"),
                "{}: {}",
                policy.id(),
                intent.reason
            );
        }
    }

    #[test]
    fn rsi_is_bounded(bars in arb_bars(0, 80), period in 1usize..30) {
        let value = rsi(&bars, period);
        prop_assert!((0.0..=100.0).contains(&value), "rsi = {}", value);
    }

    #[test]
    fn atr_short_history_is_last_range(bars in arb_bars(1, 15)) {
        let last = &bars[bars.len() - 1];
        prop_assert_eq!(atr(&bars, 14), last.high - last.low);
    }
}
