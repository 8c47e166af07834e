// In crates/notifier/src/format.rs

use chrono::{DateTime, FixedOffset, Utc};
use core_types::{CrossoverEvent, Interval, Symbol};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Renders crossover events as one-line alert messages.
#[derive(Debug, Clone, Copy)]
pub struct AlertFormatter {
    offset: FixedOffset,
    interval: Option<Interval>,
}

impl AlertFormatter {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            interval: None,
        }
    }

    /// Includes the kline interval after the direction label.
    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = Some(interval);
        self
    }

    /// `BULLISH 4h: OPUSDT @ 1.2345 [2024-01-01 07:00]`
    pub fn format(&self, symbol: &Symbol, event: &CrossoverEvent) -> String {
        let label = match self.interval {
            Some(interval) => format!("{} {}", event.direction.label(), interval),
            None => event.direction.label().to_string(),
        };
        format!(
            "{}: {} @ {} [{}]",
            label,
            symbol,
            event.close_price.normalize(),
            self.timestamp(event.at)
        )
    }

    /// `YYYY-MM-DD HH:MM` in the configured offset.
    pub fn timestamp(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.offset).format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Formats a single event without an interval label.
pub fn format_alert(symbol: &Symbol, event: &CrossoverEvent, offset: FixedOffset) -> String {
    AlertFormatter::new(offset).format(symbol, event)
}
