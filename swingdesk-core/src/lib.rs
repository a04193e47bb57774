//! SwingDesk Core: the decision core of a daily swing-trading engine.
//!
//! Given a symbol's price history, its nightly quality scores and the
//! market-wide regime, each policy decides whether to open, hold, exit or
//! skip, and for entries at what price, stop, target and size.
//!
//! - Domain types (bars, scores, regime, position snapshot, input, intent)
//! - Stateless indicator library with documented fallbacks
//! - Fixed-fractional position sizing shared by every policy
//! - Nine decision policies behind one `Strategy` trait
//! - TOML configuration and a registry that builds the enabled policies
//! - Parallel batch evaluation

pub mod batch;
pub mod config;
pub mod domain;
pub mod indicators;
pub mod sizing;
pub mod strategies;

pub use config::{ConfigError, SwingConfig};
pub use domain::{StrategyInput, TradeAction, TradeIntent};
pub use sizing::{FixedFractionalSizer, SizingError};
pub use strategies::{build_strategies, Strategy};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: domain types and policies are Send + Sync, so a
    /// caller may evaluate on any thread without wrapping them.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::ScoreBundle>();
        require_sync::<domain::ScoreBundle>();
        require_send::<domain::RegimeClassification>();
        require_sync::<domain::RegimeClassification>();
        require_send::<domain::PositionSnapshot>();
        require_sync::<domain::PositionSnapshot>();
        require_send::<domain::StrategyInput>();
        require_sync::<domain::StrategyInput>();
        require_send::<domain::TradeIntent>();
        require_sync::<domain::TradeIntent>();
        require_send::<domain::SignalId>();
        require_sync::<domain::SignalId>();

        require_send::<FixedFractionalSizer>();
        require_sync::<FixedFractionalSizer>();
        require_send::<SwingConfig>();
        require_sync::<SwingConfig>();

        require_send::<strategies::TrendFollow>();
        require_sync::<strategies::TrendFollow>();
        require_send::<strategies::MeanReversion>();
        require_sync::<strategies::MeanReversion>();
        require_send::<strategies::Breakout>();
        require_sync::<strategies::Breakout>();
        require_send::<strategies::Momentum>();
        require_sync::<strategies::Momentum>();
        require_send::<strategies::Pullback>();
        require_sync::<strategies::Pullback>();
        require_send::<strategies::VwapReversion>();
        require_sync::<strategies::VwapReversion>();
        require_send::<strategies::OpeningRangeBreakout>();
        require_sync::<strategies::OpeningRangeBreakout>();
        require_send::<strategies::MacdCrossover>();
        require_sync::<strategies::MacdCrossover>();
        require_send::<strategies::BollingerSqueeze>();
        require_sync::<strategies::BollingerSqueeze>();
        require_send::<Box<dyn Strategy>>();
        require_sync::<Box<dyn Strategy>>();
    }

    /// Compile-time check: `Strategy::evaluate` takes only the input bundle
    /// and returns an intent, with no portfolio handle, clock or RNG.
    #[allow(dead_code)]
    fn evaluate_reads_only_the_input_bundle(
        strategy: &dyn Strategy,
        input: &StrategyInput,
    ) -> TradeIntent {
        strategy.evaluate(input)
    }
}
