// In crates/app-config/src/types.rs

use std::collections::HashSet;

use chrono::FixedOffset;
use core_types::{Interval, Symbol};
use serde::{Deserialize, Deserializer};
use strategies::MacdSettings;

use crate::error::{Error, Result};

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    #[serde(default)]
    pub app: AppSettings,
    /// Settings for the Binance API.
    #[serde(default)]
    pub binance: BinanceSettings,
    /// Settings for the Slack incoming webhook.
    #[serde(default)]
    pub slack: SlackSettings,
    /// How alert messages are rendered.
    #[serde(default)]
    pub alerts: AlertSettings,
    /// Oscillator spans and weighting.
    #[serde(default)]
    pub macd: MacdSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    #[serde(default = "default_environment")]
    pub environment: String,
    /// The log level for the application.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct BinanceSettings {
    /// The API key for Binance. Public market data works without one.
    #[serde(default)]
    pub api_key: String,
    /// The REST API base URL for Binance.
    #[serde(default = "default_binance_url")]
    pub rest_base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for BinanceSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            rest_base_url: default_binance_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct SlackSettings {
    /// Incoming-webhook URL. Empty means alerts can only be printed (dry run).
    #[serde(default)]
    pub webhook_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for SlackSettings {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AlertSettings {
    /// Fixed offset used to render alert timestamps, e.g. "+07:00".
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
    /// Include the kline interval in the message ("BULLISH 4h: ...").
    #[serde(default = "default_true")]
    pub label_interval: bool,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            utc_offset: default_utc_offset(),
            label_interval: true,
        }
    }
}

impl AlertSettings {
    pub fn offset(&self) -> Result<FixedOffset> {
        parse_utc_offset(&self.utc_offset)
    }
}

/// Parses a `+HH:MM` / `-HH:MM` offset. `Z` and `UTC` mean zero.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| Error::InvalidTimezone(raw.to_string()));
    }
    raw.parse::<FixedOffset>()
        .map_err(|_| Error::InvalidTimezone(raw.to_string()))
}

// --- Structs for scanner.toml Configuration ---

/// The top-level configuration for the symbol scanner.
#[derive(Deserialize, Debug, Clone)]
pub struct ScannerConfig {
    pub scanner: ScannerSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ScannerSettings {
    /// Either a TOML array or a single comma-separated string.
    #[serde(deserialize_with = "deserialize_symbols")]
    pub symbols: Vec<Symbol>,
    #[serde(default)]
    pub interval: Interval,
    /// Number of most recent candles fetched per symbol.
    #[serde(default = "default_limit")]
    pub limit: u16,
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_deliver_timeout")]
    pub deliver_timeout_secs: u64,
    /// Seconds to wait after a candle boundary before scanning.
    #[serde(default = "default_tick_delay")]
    pub tick_delay_secs: u64,
    /// Drop a still-forming last candle before evaluating.
    #[serde(default)]
    pub closed_candles_only: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSymbols {
    Csv(String),
    List(Vec<String>),
}

fn deserialize_symbols<'de, D>(deserializer: D) -> std::result::Result<Vec<Symbol>, D::Error>
where
    D: Deserializer<'de>,
{
    let symbols = match RawSymbols::deserialize(deserializer)? {
        RawSymbols::Csv(csv) => normalise_symbols(csv.split(',')),
        RawSymbols::List(list) => normalise_symbols(list.iter().map(String::as_str)),
    };
    Ok(symbols)
}

/// Trims and upper-cases symbols, dropping blanks and repeats (first occurrence wins).
pub fn normalise_symbols<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<Symbol> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(Symbol::parse)
        .filter(|symbol| seen.insert(symbol.clone()))
        .collect()
}

/// Helper functions for serde defaults
fn default_environment() -> String { "development".into() }
fn default_log_level() -> String { "info".into() }
fn default_binance_url() -> String { "https://api.binance.com".into() }
fn default_request_timeout() -> u64 { 10 }
fn default_utc_offset() -> String { "+00:00".into() }
fn default_true() -> bool { true }
fn default_limit() -> u16 { 200 }
fn default_fetch_timeout() -> u64 { 30 }
fn default_deliver_timeout() -> u64 { 15 }
fn default_tick_delay() -> u64 { 5 }
