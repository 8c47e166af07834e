// In crates/api-client/src/lib.rs

use std::time::Duration;

use app_config::BinanceSettings;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use core_types::{Candle, Interval, PriceSeries, Symbol};
use rust_decimal::Decimal;

pub mod error;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use types::*;

pub use app_config::MAX_KLINE_LIMIT;

/// The market-data side of the pipeline: the most recent candles for a symbol.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// The name of the data source (e.g., "BinanceSpot").
    fn name(&self) -> &'static str;

    /// Returns the most recent `limit` candles at `interval`, oldest first.
    ///
    /// Network, authentication and empty results all surface as
    /// `core_types::Error::DataUnavailable`.
    async fn get_candles(
        &self,
        symbol: &Symbol,
        interval: Interval,
        limit: u16,
    ) -> core_types::Result<PriceSeries>;
}

impl ApiClient {
    /// Constructs a new ApiClient from BinanceSettings.
    pub fn new(settings: &BinanceSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        Ok(ApiClient {
            http_client,
            api_key: settings.api_key.clone(),
            base_url: settings.rest_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the most recent `limit` klines (candlesticks) for a symbol.
    ///
    /// This corresponds to the `GET /api/v3/klines` endpoint.
    pub async fn get_historical_klines(
        &self,
        symbol: &Symbol,
        interval: Interval,
        limit: u16,
    ) -> Result<Vec<Candle>> {
        let response_body = self
            .klines_request(symbol, interval, limit)
            .send()
            .await
            .map_err(Error::RequestFailed)?
            .text()
            .await
            .map_err(Error::RequestFailed)?;

        parse_klines(&response_body)
    }

    /// Builds the kline request; `limit` is clamped to what Binance accepts.
    fn klines_request(&self, symbol: &Symbol, interval: Interval, limit: u16) -> reqwest::RequestBuilder {
        let url = format!(
            "{}/api/v3/klines?symbol={}&interval={}&limit={}",
            self.base_url,
            symbol.0,
            interval.as_str(),
            limit.min(MAX_KLINE_LIMIT)
        );
        tracing::debug!(url = %url, "Requesting klines.");

        let request = self.http_client.get(&url);
        if self.api_key.is_empty() {
            request
        } else {
            request.header("X-MBX-APIKEY", &self.api_key)
        }
    }
}

#[async_trait]
impl CandleSource for ApiClient {
    fn name(&self) -> &'static str {
        "BinanceSpot"
    }

    async fn get_candles(
        &self,
        symbol: &Symbol,
        interval: Interval,
        limit: u16,
    ) -> core_types::Result<PriceSeries> {
        let unavailable = |reason: String| core_types::Error::DataUnavailable {
            symbol: symbol.0.clone(),
            reason,
        };

        let klines = self
            .get_historical_klines(symbol, interval, limit)
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        if klines.is_empty() {
            return Err(unavailable("provider returned no candles".into()));
        }

        PriceSeries::new(symbol.clone(), interval, klines)
    }
}

/// Parses a kline response body into candles.
///
/// Binance answers errors with a `{code, msg}` object instead of an array;
/// that case becomes `Error::ApiError`.
pub fn parse_klines(body: &str) -> Result<Vec<Candle>> {
    let raw_klines: Vec<RawKline> = serde_json::from_str(body).map_err(|e| {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(api_error) => Error::ApiError {
                code: api_error.code,
                msg: api_error.msg,
            },
            Err(_) => Error::DeserializationFailed(e),
        }
    })?;

    raw_klines.into_iter().map(Candle::try_from).collect()
}

impl TryFrom<RawKline> for Candle {
    type Error = Error;

    fn try_from(raw: RawKline) -> Result<Self> {
        Ok(Candle {
            open_time: millis(raw.0)?,
            open: decimal(&raw.1, "open")?,
            high: decimal(&raw.2, "high")?,
            low: decimal(&raw.3, "low")?,
            close: decimal(&raw.4, "close")?,
            volume: decimal(&raw.5, "volume")?,
            close_time: millis(raw.6)?,
            trade_count: raw.8,
        })
    }
}

fn decimal(text: &str, field: &str) -> Result<Decimal> {
    text.parse()
        .map_err(|_| Error::InvalidKline(format!("{} is not a decimal: '{}'", field, text)))
}

fn millis(ms: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| Error::InvalidKline(format!("timestamp out of range: {}", ms)))
}
