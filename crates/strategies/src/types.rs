// In crates/strategies/src/types.rs

use core_types::PriceField;
use serde::{Deserialize, Serialize};

use crate::ema::EmaConvention;
use crate::error::{Error, Result};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MacdSettings {
    #[serde(default = "default_fast_period")]
    pub fast_period: usize,
    #[serde(default = "default_slow_period")]
    pub slow_period: usize,
    #[serde(default = "default_signal_period")]
    pub signal_period: usize,

    // Which candle attribute feeds the averages
    #[serde(default)]
    pub price_field: PriceField,

    // Bias-corrected (adjusted) weighting during warm-up
    #[serde(default = "default_adjust")]
    pub adjust: bool,
}

impl Default for MacdSettings {
    fn default() -> Self {
        Self {
            fast_period: default_fast_period(),
            slow_period: default_slow_period(),
            signal_period: default_signal_period(),
            price_field: PriceField::default(),
            adjust: default_adjust(),
        }
    }
}

impl MacdSettings {
    /// Rejects non-positive spans. An inverted fast/slow pair is allowed.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("fast_period", self.fast_period),
            ("slow_period", self.slow_period),
            ("signal_period", self.signal_period),
        ] {
            if value == 0 {
                return Err(Error::InvalidPeriod { name, value });
            }
        }
        Ok(())
    }

    pub fn convention(&self) -> EmaConvention {
        EmaConvention::from_adjust(self.adjust)
    }

    /// Number of candles after which the oscillator has left its warm-up.
    pub fn warm_up_len(&self) -> usize {
        self.slow_period + self.signal_period
    }
}

fn default_fast_period() -> usize { 12 }
fn default_slow_period() -> usize { 26 }
fn default_signal_period() -> usize { 9 }
fn default_adjust() -> bool { true }
