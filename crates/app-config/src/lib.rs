// In crates/app-config/src/lib.rs

use std::path::Path;

use config::{Config, Environment, File, FileFormat};

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{
    AlertSettings, AppSettings, BinanceSettings, ScannerConfig, ScannerSettings, Settings,
    SlackSettings, normalise_symbols, parse_utc_offset,
};

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings_from(dir: &Path) -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let settings = Config::builder()
        // 1. Load the base configuration file.
        .add_source(File::with_name(&dir.join("base").to_string_lossy()))
        // 2. Load the environment-specific configuration file.
        .add_source(File::with_name(&dir.join(&environment).to_string_lossy()).required(false))
        // 3. Load settings from environment variables (e.g., `APP_SLACK__WEBHOOK_URL=...`).
        // The prefix is `APP`, separator is `__`.
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    finish(settings.try_deserialize()?)
}

/// Parses settings from a TOML document, without file or environment layering.
pub fn parse_settings(toml: &str) -> Result<Settings> {
    let settings = Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?;

    finish(settings.try_deserialize()?)
}

// Misconfiguration is fatal, so validate everything once at load time.
fn finish(settings: Settings) -> Result<Settings> {
    settings.macd.validate()?;
    settings.alerts.offset()?;
    Ok(settings)
}

/// Binance answers at most this many klines per request.
pub const MAX_KLINE_LIMIT: u16 = 1000;

/// Loads the scanner configuration from a `scanner.toml` file.
pub fn load_scanner_config_from(path: &Path) -> Result<ScannerConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_scanner_config(&content)
}

pub fn parse_scanner_config(content: &str) -> Result<ScannerConfig> {
    let config: ScannerConfig = toml::from_str(content)?;
    let scanner = &config.scanner;
    if scanner.symbols.is_empty() {
        return Err(Error::NoSymbols);
    }
    if !(1..=MAX_KLINE_LIMIT).contains(&scanner.limit) {
        return Err(Error::InvalidScanner(format!(
            "limit must be between 1 and {}, got {}",
            MAX_KLINE_LIMIT, scanner.limit
        )));
    }
    // Months vary in length; the shortest one bounds the delay.
    let interval_secs = scanner
        .interval
        .duration_ms()
        .map_or(SHORTEST_MONTH_SECS, |ms| ms as u64 / 1000);
    if scanner.tick_delay_secs >= interval_secs {
        return Err(Error::InvalidScanner(format!(
            "tick_delay_secs must be shorter than one {} candle ({}s), got {}",
            scanner.interval, interval_secs, scanner.tick_delay_secs
        )));
    }
    Ok(config)
}

const SHORTEST_MONTH_SECS: u64 = 28 * 24 * 60 * 60;

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Interval, PriceField, Symbol};

    #[test]
    fn empty_document_uses_defaults() {
        let settings = parse_settings("").unwrap();
        assert_eq!(settings.app.log_level, "info");
        assert_eq!(settings.binance.rest_base_url, "https://api.binance.com");
        assert!(settings.slack.webhook_url.is_empty());
        assert_eq!(settings.macd.fast_period, 12);
        assert_eq!(settings.macd.slow_period, 26);
        assert_eq!(settings.macd.signal_period, 9);
        assert_eq!(settings.macd.price_field, PriceField::Close);
        assert!(settings.macd.adjust);
        assert_eq!(settings.alerts.offset().unwrap().local_minus_utc(), 0);
    }

    #[test]
    fn sections_override_defaults() {
        let settings = parse_settings(
            r#"
            [slack]
            webhook_url = "https://hooks.slack.com/services/T/B/X"

            [alerts]
            utc_offset = "+07:00"
            label_interval = false

            [macd]
            fast_period = 8
            slow_period = 21
            signal_period = 5
            price_field = "open"
            adjust = false
            "#,
        )
        .unwrap();

        assert_eq!(settings.slack.webhook_url, "https://hooks.slack.com/services/T/B/X");
        assert_eq!(settings.alerts.offset().unwrap().local_minus_utc(), 7 * 3600);
        assert!(!settings.alerts.label_interval);
        assert_eq!(settings.macd.fast_period, 8);
        assert_eq!(settings.macd.price_field, PriceField::Open);
        assert!(!settings.macd.adjust);
    }

    #[test]
    fn zero_span_is_fatal() {
        let err = parse_settings("[macd]\nslow_period = 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidMacd(_)));
    }

    #[test]
    fn bad_offset_is_fatal() {
        let err = parse_settings("[alerts]\nutc_offset = \"Asia/Bangkok\"\n").unwrap_err();
        assert!(matches!(err, Error::InvalidTimezone(_)));
    }

    #[test]
    fn utc_offsets() {
        assert_eq!(parse_utc_offset("+07:00").unwrap().local_minus_utc(), 25_200);
        assert_eq!(parse_utc_offset("-03:30").unwrap().local_minus_utc(), -12_600);
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset(" utc ").unwrap().local_minus_utc(), 0);
        assert!(parse_utc_offset("7").is_err());
        assert!(parse_utc_offset("+7:00").is_err());
        assert!(parse_utc_offset("+24:00").is_err());
        assert!(parse_utc_offset("").is_err());
        assert!(parse_utc_offset("+-1:00").is_err());
        assert!(parse_utc_offset("+07:-5").is_err());
        assert!(parse_utc_offset("--07:00").is_err());
    }

    #[test]
    fn doubled_sign_offset_is_fatal() {
        let err = parse_settings("[alerts]\nutc_offset = \"+-1:00\"\n").unwrap_err();
        assert!(matches!(err, Error::InvalidTimezone(_)));
    }

    #[test]
    fn scanner_accepts_comma_separated_symbols() {
        let config = parse_scanner_config(
            r#"
            [scanner]
            symbols = "OPUSDT, btcusdt,,OPUSDT ,ETHUSDT"
            "#,
        )
        .unwrap();

        let symbols: Vec<&str> = config.scanner.symbols.iter().map(Symbol::as_str).collect();
        assert_eq!(symbols, ["OPUSDT", "BTCUSDT", "ETHUSDT"]);
        assert_eq!(config.scanner.interval, Interval::FourHours);
        assert_eq!(config.scanner.limit, 200);
        assert!(!config.scanner.closed_candles_only);
    }

    #[test]
    fn scanner_accepts_symbol_array() {
        let config = parse_scanner_config(
            r#"
            [scanner]
            symbols = ["opusdt", "OPUSDT", "arbusdt"]
            interval = "1h"
            limit = 120
            closed_candles_only = true
            "#,
        )
        .unwrap();

        assert_eq!(
            config.scanner.symbols,
            vec![Symbol("OPUSDT".into()), Symbol("ARBUSDT".into())]
        );
        assert_eq!(config.scanner.interval, Interval::OneHour);
        assert_eq!(config.scanner.limit, 120);
        assert!(config.scanner.closed_candles_only);
    }

    #[test]
    fn scanner_without_symbols_is_rejected() {
        let err = parse_scanner_config("[scanner]\nsymbols = \" , \"\n").unwrap_err();
        assert!(matches!(err, Error::NoSymbols));
    }

    #[test]
    fn scanner_limit_must_fit_one_request() {
        for limit in [0, 1001, 5000] {
            let doc = format!("[scanner]\nsymbols = \"OPUSDT\"\nlimit = {limit}\n");
            let err = parse_scanner_config(&doc).unwrap_err();
            assert!(matches!(err, Error::InvalidScanner(_)), "limit {limit}: {err:?}");
        }
        let config = parse_scanner_config("[scanner]\nsymbols = \"OPUSDT\"\nlimit = 1000\n").unwrap();
        assert_eq!(config.scanner.limit, 1000);
    }

    #[test]
    fn tick_delay_must_be_shorter_than_the_interval() {
        let err = parse_scanner_config(
            "[scanner]\nsymbols = \"OPUSDT\"\ninterval = \"1m\"\ntick_delay_secs = 60\n",
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidScanner(_)));

        let err = parse_scanner_config(
            "[scanner]\nsymbols = \"OPUSDT\"\ninterval = \"1M\"\ntick_delay_secs = 99999999999\n",
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidScanner(_)));

        let config = parse_scanner_config(
            "[scanner]\nsymbols = \"OPUSDT\"\ninterval = \"1m\"\ntick_delay_secs = 59\n",
        )
        .unwrap();
        assert_eq!(config.scanner.tick_delay_secs, 59);
    }

    #[test]
    fn environment_overrides_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("base.toml"),
            "[app]\nlog_level = \"info\"\n\n[slack]\nwebhook_url = \"https://from-base\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("development.toml"),
            "[app]\nlog_level = \"debug\"\n",
        )
        .unwrap();

        // Only this test touches the process environment.
        unsafe {
            std::env::remove_var("APP_ENVIRONMENT");
            std::env::set_var("APP_SLACK__WEBHOOK_URL", "https://from-env");
        }
        let settings = load_settings_from(dir.path());
        unsafe {
            std::env::remove_var("APP_SLACK__WEBHOOK_URL");
        }
        let settings = settings.unwrap();

        assert_eq!(settings.slack.webhook_url, "https://from-env");
        assert_eq!(settings.app.log_level, "debug");
    }

    #[test]
    fn missing_base_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_settings_from(dir.path()), Err(Error::LoadError(_))));
    }

    #[test]
    fn scanner_rejects_unknown_interval() {
        let err = parse_scanner_config("[scanner]\nsymbols = \"OPUSDT\"\ninterval = \"7m\"\n")
            .unwrap_err();
        assert!(matches!(err, Error::TomlError(_)));
    }
}
