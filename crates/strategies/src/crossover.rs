// In crates/strategies/src/crossover.rs

use core_types::{CrossoverEvent, Direction, OscillatorSeries};

/// How the MACD line moved relative to its signal line between two consecutive points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    StayedBelow,
    CrossedAbove,
    CrossedBelow,
    StayedAbove,
}

impl Transition {
    /// Classifies a pair of "macd strictly above signal" flags.
    pub fn from_states(prev_above: bool, curr_above: bool) -> Self {
        match (prev_above, curr_above) {
            (false, false) => Transition::StayedBelow,
            (false, true) => Transition::CrossedAbove,
            (true, false) => Transition::CrossedBelow,
            (true, true) => Transition::StayedAbove,
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            Transition::CrossedAbove => Some(Direction::Bullish),
            Transition::CrossedBelow => Some(Direction::Bearish),
            Transition::StayedBelow | Transition::StayedAbove => None,
        }
    }
}

/// Reports a crossover on the newest point only.
///
/// Compares the last two points; earlier crossovers in the window are ignored.
/// A tie (`macd == signal`) counts as below in both positions, so a flat tie is
/// never reported and leaving a tie upwards is bullish.
pub fn detect(oscillator: &OscillatorSeries) -> Option<CrossoverEvent> {
    let (prev, curr) = oscillator.last_pair()?;
    let transition = Transition::from_states(prev.is_above_signal(), curr.is_above_signal());

    transition.direction().map(|direction| CrossoverEvent {
        direction,
        at: curr.open_time,
        close_price: curr.close,
    })
}
