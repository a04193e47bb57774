//! Engine configuration: risk budget plus per-policy parameters.
//!
//! Loaded from TOML. Every section is optional and falls back to the defaults
//! documented on each parameter struct, so an empty file is a valid config
//! that enables all nine policies at 1% risk per trade.
//!
//! ```toml
//! [risk]
//! max_risk_per_trade_pct = 1.0
//!
//! [strategies]
//! enabled = ["trend_follow_v1", "breakout_v1"]
//!
//! [strategies.breakout]
//! volume_multiplier = 2.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::sizing::FixedFractionalSizer;
use crate::strategies::{
    BollingerSqueezeParams, BreakoutParams, MacdCrossoverParams, MeanReversionParams,
    MomentumParams, OrbParams, PullbackParams, TrendFollowParams, VwapReversionParams,
    ALL_STRATEGY_IDS,
};

// ─── Error type ──────────────────────────────────────────────────────

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
    #[error("unknown strategy id: {0}")]
    UnknownStrategy(String),
}

// ─── Validation helpers ──────────────────────────────────────────────

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Score thresholds and confidence floors live in [0, 1].
pub(crate) fn ensure_unit(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(field, format!("{value} is outside [0, 1]")));
    }
    Ok(())
}

/// Multipliers and ratios must be finite and strictly positive.
pub(crate) fn ensure_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(field, format!("{value} must be > 0")));
    }
    Ok(())
}

pub(crate) fn ensure_period(field: &str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(invalid(field, "must be >= 1"));
    }
    Ok(())
}

/// RSI-style bounds live in [0, 100].
pub(crate) fn ensure_percent(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(invalid(field, format!("{value} is outside [0, 100]")));
    }
    Ok(())
}

pub(crate) fn ensure_ordered(field: &str, low: f64, high: f64) -> Result<(), ConfigError> {
    if low > high {
        return Err(invalid(field, format!("lower bound {low} > upper bound {high}")));
    }
    Ok(())
}

// ─── Risk ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RiskConfig {
    /// Percent of available capital risked per trade, in (0, 100].
    pub max_risk_per_trade_pct: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_risk_per_trade_pct: 1.0,
        }
    }
}

impl RiskConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pct = self.max_risk_per_trade_pct;
        if !pct.is_finite() || pct <= 0.0 || pct > 100.0 {
            return Err(invalid(
                "risk.max_risk_per_trade_pct",
                format!("{pct} must be in (0, 100]"),
            ));
        }
        Ok(())
    }

    pub fn sizer(&self) -> FixedFractionalSizer {
        FixedFractionalSizer::new(self.max_risk_per_trade_pct)
    }
}

// ─── Strategies ──────────────────────────────────────────────────────

fn all_strategy_ids() -> Vec<String> {
    ALL_STRATEGY_IDS.iter().map(|id| id.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrategiesConfig {
    /// Policy ids to run. Defaults to all nine.
    pub enabled: Vec<String>,
    pub trend_follow: TrendFollowParams,
    pub mean_reversion: MeanReversionParams,
    pub breakout: BreakoutParams,
    pub momentum: MomentumParams,
    pub pullback: PullbackParams,
    pub vwap_reversion: VwapReversionParams,
    pub bollinger_squeeze: BollingerSqueezeParams,
    pub macd_crossover: MacdCrossoverParams,
    pub orb: OrbParams,
}

impl Default for StrategiesConfig {
    fn default() -> Self {
        Self {
            enabled: all_strategy_ids(),
            trend_follow: TrendFollowParams::default(),
            mean_reversion: MeanReversionParams::default(),
            breakout: BreakoutParams::default(),
            momentum: MomentumParams::default(),
            pullback: PullbackParams::default(),
            vwap_reversion: VwapReversionParams::default(),
            bollinger_squeeze: BollingerSqueezeParams::default(),
            macd_crossover: MacdCrossoverParams::default(),
            orb: OrbParams::default(),
        }
    }
}

impl StrategiesConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(unknown) = self
            .enabled
            .iter()
            .find(|id| !ALL_STRATEGY_IDS.contains(&id.as_str()))
        {
            return Err(ConfigError::UnknownStrategy(unknown.clone()));
        }
        self.trend_follow.validate()?;
        self.mean_reversion.validate()?;
        self.breakout.validate()?;
        self.momentum.validate()?;
        self.pullback.validate()?;
        self.vwap_reversion.validate()?;
        self.bollinger_squeeze.validate()?;
        self.macd_crossover.validate()?;
        self.orb.validate()?;
        Ok(())
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.enabled.iter().any(|e| e == id)
    }
}

// ─── Top level ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwingConfig {
    pub risk: RiskConfig,
    pub strategies: StrategiesConfig,
}

impl SwingConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SwingConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        info!(
            path = %path.display(),
            risk_pct = config.risk.max_risk_per_trade_pct,
            enabled = ?config.strategies.enabled,
            "loaded config"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.risk.validate()?;
        self.strategies.validate()
    }
}
