//! Domain types for the swing-trading decision core.
//!
//! Every type here is a plain value: constructed fresh per (symbol, date),
//! consumed once by a policy, then discarded.

pub mod bar;
pub mod ids;
pub mod input;
pub mod intent;
pub mod position;
pub mod regime;
pub mod score;

pub use bar::Bar;
pub use ids::SignalId;
pub use input::StrategyInput;
pub use intent::{TradeAction, TradeIntent};
pub use position::PositionSnapshot;
pub use regime::{Regime, RegimeClassification};
pub use score::ScoreBundle;
