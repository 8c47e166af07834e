// In crates/strategies/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid {name}: {value} (must be a positive integer)")]
    InvalidPeriod { name: &'static str, value: usize },

    #[error("Cannot compute an oscillator over an empty price series")]
    EmptySeries,
}

pub type Result<T> = std::result::Result<T, Error>;
