// In crates/api-client/src/types.rs

use reqwest::Client;
use serde::Deserialize;

/// The client for Binance's public market-data REST endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// The persistent HTTP client.
    pub http_client: Client,
    /// The user's Binance API key. Sent as a header when non-empty.
    pub api_key: String,
    /// The base URL for the Binance REST API.
    pub base_url: String,
}

/// Temporary struct to deserialize the kline response from Binance,
/// which is a JSON array of mixed types.
#[derive(Debug, Deserialize)]
pub struct RawKline(
    pub i64,         // 0: Open time
    pub String,      // 1: Open
    pub String,      // 2: High
    pub String,      // 3: Low
    pub String,      // 4: Close
    pub String,      // 5: Volume
    pub i64,         // 6: Close time
    pub String,      // 7: Quote asset volume
    pub u64,         // 8: Number of trades
    pub String,      // 9: Taker buy base asset volume
    pub String,      // 10: Taker buy quote asset volume
    pub String,      // 11: Ignore
);

/// The error object Binance returns instead of a payload.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
}
