// In crates/engine/src/error.rs

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// The adapter call a timeout applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Deliver,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Fetch => f.write_str("fetch"),
            Stage::Deliver => f.write_str("delivery"),
        }
    }
}

/// Everything that can end one symbol's scan early.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Data(#[from] core_types::Error),

    #[error("{stage} for {symbol} timed out after {after:?}")]
    Timeout {
        symbol: String,
        stage: Stage,
        after: Duration,
    },

    #[error("Oscillator computation failed: {0}")]
    Compute(#[from] strategies::Error),

    #[error("Scan task for {symbol} aborted: {reason}")]
    TaskAborted { symbol: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
