//! Parallel batch evaluation.
//!
//! Policies are pure, so (input, policy) pairs can be evaluated on the rayon
//! pool with no locking. Output order is input-major, then policy order, and
//! does not depend on thread scheduling.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{StrategyInput, TradeAction, TradeIntent};
use crate::strategies::Strategy;

/// Evaluate every policy against every input.
pub fn evaluate_all(strategies: &[Box<dyn Strategy>], inputs: &[StrategyInput]) -> Vec<TradeIntent> {
    let intents: Vec<TradeIntent> = inputs
        .par_iter()
        .flat_map_iter(|input| strategies.iter().map(move |s| s.evaluate(input)))
        .collect();
    info!(
        inputs = inputs.len(),
        strategies = strategies.len(),
        intents = intents.len(),
        "batch evaluated"
    );
    intents
}

/// Sequential reference path, same ordering as [`evaluate_all`].
pub fn evaluate_all_sequential(
    strategies: &[Box<dyn Strategy>],
    inputs: &[StrategyInput],
) -> Vec<TradeIntent> {
    inputs
        .iter()
        .flat_map(|input| strategies.iter().map(move |s| s.evaluate(input)))
        .collect()
}

/// Action counts for one policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCounts {
    pub buy: usize,
    pub hold: usize,
    pub exit: usize,
    pub skip: usize,
}

impl ActionCounts {
    fn record(&mut self, action: TradeAction) {
        match action {
            TradeAction::Buy => self.buy += 1,
            TradeAction::Hold => self.hold += 1,
            TradeAction::Exit => self.exit += 1,
            TradeAction::Skip => self.skip += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.buy + self.hold + self.exit + self.skip
    }
}

/// Per-policy action counts for a batch, keyed by strategy id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionSummary {
    pub by_strategy: BTreeMap<String, ActionCounts>,
}

impl DecisionSummary {
    pub fn from_intents(intents: &[TradeIntent]) -> Self {
        let mut by_strategy: BTreeMap<String, ActionCounts> = BTreeMap::new();
        for intent in intents {
            by_strategy
                .entry(intent.strategy_id.clone())
                .or_default()
                .record(intent.action);
        }
        Self { by_strategy }
    }

    pub fn totals(&self) -> ActionCounts {
        self.by_strategy
            .values()
            .fold(ActionCounts::default(), |acc, c| ActionCounts {
                buy: acc.buy + c.buy,
                hold: acc.hold + c.hold,
                exit: acc.exit + c.exit,
                skip: acc.skip + c.skip,
            })
    }
}
