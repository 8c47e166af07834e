// In crates/core-types/src/types.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A market symbol as the exchange spells it (e.g., "OPUSDT").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl Symbol {
    /// Normalises a user-supplied symbol: trims whitespace and upper-cases it.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Symbol(trimmed.to_uppercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kline intervals supported by the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Interval {
    OneMinute,
    ThreeMinutes,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    TwoHours,
    #[default]
    FourHours,
    SixHours,
    EightHours,
    TwelveHours,
    OneDay,
    ThreeDays,
    OneWeek,
    OneMonth,
}

impl Interval {
    pub const ALL: [Interval; 15] = [
        Interval::OneMinute,
        Interval::ThreeMinutes,
        Interval::FiveMinutes,
        Interval::FifteenMinutes,
        Interval::ThirtyMinutes,
        Interval::OneHour,
        Interval::TwoHours,
        Interval::FourHours,
        Interval::SixHours,
        Interval::EightHours,
        Interval::TwelveHours,
        Interval::OneDay,
        Interval::ThreeDays,
        Interval::OneWeek,
        Interval::OneMonth,
    ];

    /// The wire representation used in REST query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1m",
            Interval::ThreeMinutes => "3m",
            Interval::FiveMinutes => "5m",
            Interval::FifteenMinutes => "15m",
            Interval::ThirtyMinutes => "30m",
            Interval::OneHour => "1h",
            Interval::TwoHours => "2h",
            Interval::FourHours => "4h",
            Interval::SixHours => "6h",
            Interval::EightHours => "8h",
            Interval::TwelveHours => "12h",
            Interval::OneDay => "1d",
            Interval::ThreeDays => "3d",
            Interval::OneWeek => "1w",
            Interval::OneMonth => "1M",
        }
    }

    /// Fixed length of one candle in milliseconds.
    ///
    /// Calendar months have no fixed length, so `OneMonth` returns `None`.
    pub fn duration_ms(&self) -> Option<i64> {
        const MINUTE: i64 = 60_000;
        const HOUR: i64 = 60 * MINUTE;
        const DAY: i64 = 24 * HOUR;
        let ms = match self {
            Interval::OneMinute => MINUTE,
            Interval::ThreeMinutes => 3 * MINUTE,
            Interval::FiveMinutes => 5 * MINUTE,
            Interval::FifteenMinutes => 15 * MINUTE,
            Interval::ThirtyMinutes => 30 * MINUTE,
            Interval::OneHour => HOUR,
            Interval::TwoHours => 2 * HOUR,
            Interval::FourHours => 4 * HOUR,
            Interval::SixHours => 6 * HOUR,
            Interval::EightHours => 8 * HOUR,
            Interval::TwelveHours => 12 * HOUR,
            Interval::OneDay => DAY,
            Interval::ThreeDays => 3 * DAY,
            Interval::OneWeek => 7 * DAY,
            Interval::OneMonth => return None,
        };
        Some(ms)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Interval::ALL
            .iter()
            .copied()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| format!("unknown kline interval '{}'", s))
    }
}

impl TryFrom<String> for Interval {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Interval> for String {
    fn from(value: Interval) -> Self {
        value.as_str().to_string()
    }
}

/// A single OHLCV candle as produced by the market-data adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub close_time: DateTime<Utc>,
    pub trade_count: u64,
}

/// Which candle attribute feeds the moving averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceField {
    Open,
    High,
    Low,
    #[default]
    Close,
    Volume,
}

impl PriceField {
    pub fn select(&self, candle: &Candle) -> Decimal {
        match self {
            PriceField::Open => candle.open,
            PriceField::High => candle.high,
            PriceField::Low => candle.low,
            PriceField::Close => candle.close,
            PriceField::Volume => candle.volume,
        }
    }

    /// The selected attribute as `f64`.
    ///
    /// Goes through the decimal string so the result is the correctly rounded
    /// parse of the exchange's textual price.
    pub fn value(&self, candle: &Candle) -> f64 {
        self.select(candle)
            .to_string()
            .parse::<f64>()
            .unwrap_or(f64::NAN)
    }
}

/// Candles for one symbol and interval, strictly ascending by `open_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: Symbol,
    interval: Interval,
    candles: Vec<Candle>,
}

impl PriceSeries {
    /// Builds a series, rejecting candles that are not strictly ascending by open time.
    pub fn new(symbol: Symbol, interval: Interval, candles: Vec<Candle>) -> Result<Self> {
        if let Some(index) = candles
            .windows(2)
            .position(|pair| pair[1].open_time <= pair[0].open_time)
        {
            return Err(Error::OutOfOrder {
                symbol: symbol.0,
                index: index + 1,
            });
        }
        Ok(Self {
            symbol,
            interval,
            candles,
        })
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// The selected price attribute of every candle, in order.
    pub fn values(&self, field: PriceField) -> Vec<f64> {
        self.candles.iter().map(|c| field.value(c)).collect()
    }

    /// Drops a trailing candle that has not closed yet at `now`.
    pub fn without_unclosed(mut self, now: DateTime<Utc>) -> Self {
        if self.candles.last().is_some_and(|c| c.close_time > now) {
            self.candles.pop();
        }
        self
    }
}
