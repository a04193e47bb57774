//! Registry: converts a [`SwingConfig`] into runtime trait objects.

use super::{
    bollinger_squeeze, breakout, macd_crossover, mean_reversion, momentum, orb, pullback,
    trend_follow, vwap_reversion, BollingerSqueeze, Breakout, MacdCrossover, MeanReversion,
    Momentum, OpeningRangeBreakout, Pullback, Strategy, TrendFollow, VwapReversion,
};
use crate::config::{ConfigError, SwingConfig};

/// Every policy id, in canonical evaluation order.
pub const ALL_STRATEGY_IDS: [&str; 9] = [
    trend_follow::ID,
    mean_reversion::ID,
    breakout::ID,
    momentum::ID,
    pullback::ID,
    vwap_reversion::ID,
    orb::ID,
    macd_crossover::ID,
    bollinger_squeeze::ID,
];

/// Build one policy by id using its parameter block from `config`.
///
/// Does not check whether the id is enabled; see [`build_strategies`].
pub fn create_strategy(id: &str, config: &SwingConfig) -> Result<Box<dyn Strategy>, ConfigError> {
    let sizer = config.risk.sizer();
    let s = &config.strategies;
    let strategy: Box<dyn Strategy> = match id {
        trend_follow::ID => Box::new(TrendFollow::new(s.trend_follow.clone(), sizer)),
        mean_reversion::ID => Box::new(MeanReversion::new(s.mean_reversion.clone(), sizer)),
        breakout::ID => Box::new(Breakout::new(s.breakout.clone(), sizer)),
        momentum::ID => Box::new(Momentum::new(s.momentum.clone(), sizer)),
        pullback::ID => Box::new(Pullback::new(s.pullback.clone(), sizer)),
        vwap_reversion::ID => Box::new(VwapReversion::new(s.vwap_reversion.clone(), sizer)),
        orb::ID => Box::new(OpeningRangeBreakout::new(s.orb.clone(), sizer)),
        macd_crossover::ID => Box::new(MacdCrossover::new(s.macd_crossover.clone(), sizer)),
        bollinger_squeeze::ID => {
            Box::new(BollingerSqueeze::new(s.bollinger_squeeze.clone(), sizer))
        }
        other => return Err(ConfigError::UnknownStrategy(other.to_string())),
    };
    Ok(strategy)
}

/// Validate `config` and build every enabled policy in canonical order.
pub fn build_strategies(config: &SwingConfig) -> Result<Vec<Box<dyn Strategy>>, ConfigError> {
    config.validate()?;
    ALL_STRATEGY_IDS
        .iter()
        .filter(|id| config.strategies.is_enabled(id))
        .map(|id| create_strategy(id, config))
        .collect()
}
