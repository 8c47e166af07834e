// In crates/core-types/src/error.rs

use thiserror::Error;

/// The failure kinds shared by every stage of the scan pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The provider could not be reached, rejected the request, or returned no candles.
    #[error("Market data unavailable for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Too few aligned points to compare two consecutive oscillator states.
    #[error("Series for {symbol} has {points} point(s); at least 2 are required")]
    InvalidSeries { symbol: String, points: usize },

    /// Candles are not strictly ascending by open time.
    #[error("Series for {symbol} is out of order at index {index}")]
    OutOfOrder { symbol: String, index: usize },

    /// The notification channel refused or failed to accept the message.
    #[error("Alert delivery failed: {0}")]
    DeliveryFailed(String),
}

pub type Result<T> = std::result::Result<T, Error>;
