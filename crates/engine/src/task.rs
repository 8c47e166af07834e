// In crates/engine/src/task.rs

use std::sync::Arc;

use api_client::CandleSource;
use chrono::Utc;
use core_types::{CrossoverEvent, PriceSeries, Symbol};
use notifier::{AlertFormatter, Notifier};
use strategies::Strategy;
use tokio::time::timeout;

use crate::error::{Error, Result, Stage};
use crate::{ScanOptions, SymbolOutcome};

/// A self-contained fetch → compute → detect → notify chain for a single symbol.
///
/// Owns its handles so it can run on its own tokio task; it shares nothing
/// mutable with the tasks of other symbols.
pub struct ScanTask {
    symbol: Symbol,
    source: Arc<dyn CandleSource>,
    strategy: Arc<dyn Strategy + Send + Sync>,
    notifier: Arc<dyn Notifier>,
    formatter: AlertFormatter,
    options: ScanOptions,
}

impl ScanTask {
    pub fn new(
        symbol: Symbol,
        source: Arc<dyn CandleSource>,
        strategy: Arc<dyn Strategy + Send + Sync>,
        notifier: Arc<dyn Notifier>,
        formatter: AlertFormatter,
        options: ScanOptions,
    ) -> Self {
        Self {
            symbol,
            source,
            strategy,
            notifier,
            formatter,
            options,
        }
    }

    /// Runs the whole chain. Never fails: every error ends up in the outcome.
    pub async fn run(self) -> SymbolOutcome {
        let event = match self.evaluate().await {
            Ok(Some(event)) => event,
            Ok(None) => {
                tracing::debug!(symbol = %self.symbol, "No crossover on the latest candle.");
                return SymbolOutcome::NoSignal;
            }
            Err(Error::Data(core_types::Error::InvalidSeries { points, .. })) => {
                tracing::warn!(
                    symbol = %self.symbol,
                    candles = points,
                    "Too few candles to compare two oscillator states."
                );
                return SymbolOutcome::NoSignal;
            }
            Err(e) => {
                tracing::error!(symbol = %self.symbol, error = %e, "Scan failed; skipping symbol.");
                return SymbolOutcome::Failed(e);
            }
        };

        let message = self.formatter.format(&self.symbol, &event);
        match self.deliver(&message).await {
            Ok(()) => {
                tracing::info!(
                    symbol = %self.symbol,
                    direction = %event.direction,
                    channel = self.notifier.name(),
                    "Alert delivered."
                );
                SymbolOutcome::Alerted(event)
            }
            Err(e) => {
                tracing::error!(
                    symbol = %self.symbol,
                    direction = %event.direction,
                    error = %e,
                    "Alert delivery failed; not retrying."
                );
                SymbolOutcome::DeliveryFailed { event, error: e }
            }
        }
    }

    /// Fetches the window and asks the strategy about its newest candle.
    pub async fn evaluate(&self) -> Result<Option<CrossoverEvent>> {
        let series = self.fetch().await?;
        let series = if self.options.closed_candles_only {
            series.without_unclosed(Utc::now())
        } else {
            series
        };

        if series.len() < 2 {
            return Err(core_types::Error::InvalidSeries {
                symbol: self.symbol.0.clone(),
                points: series.len(),
            }
            .into());
        }

        Ok(self.strategy.assess(&series)?)
    }

    async fn fetch(&self) -> Result<PriceSeries> {
        let call = self
            .source
            .get_candles(&self.symbol, self.options.interval, self.options.limit);

        match timeout(self.options.fetch_timeout, call).await {
            Ok(series) => Ok(series?),
            Err(_) => Err(Error::Timeout {
                symbol: self.symbol.0.clone(),
                stage: Stage::Fetch,
                after: self.options.fetch_timeout,
            }),
        }
    }

    async fn deliver(&self, message: &str) -> Result<()> {
        match timeout(self.options.deliver_timeout, self.notifier.deliver(message)).await {
            Ok(delivered) => Ok(delivered?),
            Err(_) => Err(Error::Timeout {
                symbol: self.symbol.0.clone(),
                stage: Stage::Deliver,
                after: self.options.deliver_timeout,
            }),
        }
    }
}
