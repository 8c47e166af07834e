// In crates/strategies/src/lib.rs

use core_types::{CrossoverEvent, PriceSeries};

pub mod crossover;
pub mod ema;
pub mod error;
pub mod macd;
pub mod macd_crossover;
pub mod types;

pub use error::{Error, Result};
pub use macd_crossover::MacdCrossover;
pub use types::MacdSettings;

/// The universal interface for a signal strategy.
///
/// A strategy turns the freshest window of candles into at most one event for
/// the newest candle. It keeps no state between calls: every assessment is
/// re-derived from the window it is given, so one instance can be shared by
/// all symbols of a run.
pub trait Strategy {
    /// The name of the strategy.
    fn name(&self) -> &'static str;

    fn assess(&self, series: &PriceSeries) -> Result<Option<CrossoverEvent>>;
}
