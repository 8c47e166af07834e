// In crates/strategies/src/macd_crossover.rs

use core_types::{CrossoverEvent, OscillatorSeries, PriceSeries};

use crate::error::Result;
use crate::types::MacdSettings;
use crate::{Strategy, crossover, macd};

/// Alerts when the MACD line crosses its signal line on the newest candle.
#[derive(Debug, Clone)]
pub struct MacdCrossover {
    settings: MacdSettings,
}

impl MacdCrossover {
    /// Creates a new `MacdCrossover`, rejecting zero spans up front.
    pub fn new(settings: MacdSettings) -> Result<Self> {
        settings.validate()?;
        if settings.fast_period >= settings.slow_period {
            tracing::warn!(
                fast = settings.fast_period,
                slow = settings.slow_period,
                "Fast period is not shorter than slow period; the MACD line will be inverted."
            );
        }
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &MacdSettings {
        &self.settings
    }

    /// The full oscillator for a window, index-aligned with its candles.
    pub fn oscillator(&self, series: &PriceSeries) -> Result<OscillatorSeries> {
        macd::compute(series, &self.settings)
    }
}

impl Strategy for MacdCrossover {
    fn name(&self) -> &'static str {
        "MacdCrossover"
    }

    fn assess(&self, series: &PriceSeries) -> Result<Option<CrossoverEvent>> {
        if series.len() < self.settings.warm_up_len() {
            tracing::debug!(
                symbol = %series.symbol(),
                candles = series.len(),
                warm_up = self.settings.warm_up_len(),
                "Window is shorter than the oscillator warm-up; signal is low-confidence."
            );
        }

        let oscillator = self.oscillator(series)?;
        Ok(crossover::detect(&oscillator))
    }
}
