// In crates/core-types/src/signal.rs

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// MACD and signal-line values for one candle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscillatorPoint {
    pub open_time: DateTime<Utc>,
    /// Close price of the candle this point is aligned with.
    pub close: Decimal,
    pub macd: f64,
    pub signal: f64,
}

impl OscillatorPoint {
    pub fn histogram(&self) -> f64 {
        self.macd - self.signal
    }

    /// Strictly above the signal line. A tie counts as not above.
    pub fn is_above_signal(&self) -> bool {
        self.macd > self.signal
    }
}

/// Oscillator output, index-aligned with the price series it was computed from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OscillatorSeries {
    points: Vec<OscillatorPoint>,
}

impl OscillatorSeries {
    pub fn new(points: Vec<OscillatorPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[OscillatorPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The second-to-last and last points, if there are at least two.
    pub fn last_pair(&self) -> Option<(&OscillatorPoint, &OscillatorPoint)> {
        match self.points.as_slice() {
            [.., prev, curr] => Some((prev, curr)),
            _ => None,
        }
    }

    /// The trailing `n` points (or all of them if there are fewer).
    pub fn tail(&self, n: usize) -> &[OscillatorPoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }
}

impl From<Vec<OscillatorPoint>> for OscillatorSeries {
    fn from(points: Vec<OscillatorPoint>) -> Self {
        Self::new(points)
    }
}

/// Which way the MACD line crossed its signal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Bullish,
    Bearish,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Bullish => "BULLISH",
            Direction::Bearish => "BEARISH",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A crossover observed on the newest candle of a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossoverEvent {
    pub direction: Direction,
    pub at: DateTime<Utc>,
    pub close_price: Decimal,
}
