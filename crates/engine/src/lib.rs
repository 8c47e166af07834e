// In crates/engine/src/lib.rs

pub mod error;
pub mod schedule;
pub mod task;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use api_client::CandleSource;
use app_config::ScannerSettings;
use chrono::Utc;
use core_types::{CrossoverEvent, Interval, Symbol};
use futures::future;
use notifier::{AlertFormatter, Notifier};
use strategies::Strategy;

pub use crate::error::{Error, Result, Stage};
use crate::task::ScanTask;

/// Per-run knobs shared by every symbol's task.
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    pub interval: Interval,
    pub limit: u16,
    pub fetch_timeout: Duration,
    pub deliver_timeout: Duration,
    pub tick_delay: Duration,
    pub closed_candles_only: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            interval: Interval::FourHours,
            limit: 200,
            fetch_timeout: Duration::from_secs(30),
            deliver_timeout: Duration::from_secs(15),
            tick_delay: Duration::from_secs(5),
            closed_candles_only: false,
        }
    }
}

impl From<&ScannerSettings> for ScanOptions {
    fn from(settings: &ScannerSettings) -> Self {
        Self {
            interval: settings.interval,
            limit: settings.limit,
            fetch_timeout: Duration::from_secs(settings.fetch_timeout_secs),
            deliver_timeout: Duration::from_secs(settings.deliver_timeout_secs),
            tick_delay: Duration::from_secs(settings.tick_delay_secs),
            closed_candles_only: settings.closed_candles_only,
        }
    }
}

/// What happened to one symbol during a run.
#[derive(Debug)]
pub enum SymbolOutcome {
    NoSignal,
    Alerted(CrossoverEvent),
    DeliveryFailed { event: CrossoverEvent, error: Error },
    Failed(Error),
}

/// Outcomes of a single pass over the configured symbols.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<(Symbol, SymbolOutcome)>,
}

impl RunReport {
    pub fn outcome(&self, symbol: &Symbol) -> Option<&SymbolOutcome> {
        self.outcomes
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, outcome)| outcome)
    }

    pub fn alerted(&self) -> usize {
        self.count(|o| matches!(o, SymbolOutcome::Alerted(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SymbolOutcome::Failed(_) | SymbolOutcome::DeliveryFailed { .. }))
    }

    fn count(&self, predicate: impl Fn(&SymbolOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| predicate(o)).count()
    }
}

/// The orchestrator for a scan: one independent task per symbol.
pub struct Engine {
    source: Arc<dyn CandleSource>,
    strategy: Arc<dyn Strategy + Send + Sync>,
    notifier: Arc<dyn Notifier>,
    formatter: AlertFormatter,
    options: ScanOptions,
}

impl Engine {
    pub fn new(
        source: Arc<dyn CandleSource>,
        strategy: Arc<dyn Strategy + Send + Sync>,
        notifier: Arc<dyn Notifier>,
        formatter: AlertFormatter,
        options: ScanOptions,
    ) -> Self {
        Self {
            source,
            strategy,
            notifier,
            formatter,
            options,
        }
    }

    /// Scans every symbol once.
    ///
    /// Symbols are deduplicated and each is processed on its own task; a
    /// failure in one is logged and recorded without touching the others.
    /// Delivery order across symbols is unspecified.
    pub async fn run_once(&self, symbols: &[Symbol]) -> RunReport {
        let mut seen = HashSet::new();
        let unique: Vec<Symbol> = symbols
            .iter()
            .filter(|s| seen.insert(*s))
            .cloned()
            .collect();

        tracing::info!(
            symbols = unique.len(),
            interval = %self.options.interval,
            strategy = self.strategy.name(),
            source = self.source.name(),
            "Starting scan."
        );

        let handles: Vec<_> = unique
            .iter()
            .map(|symbol| {
                let task = ScanTask::new(
                    symbol.clone(),
                    Arc::clone(&self.source),
                    Arc::clone(&self.strategy),
                    Arc::clone(&self.notifier),
                    self.formatter,
                    self.options,
                );
                tokio::spawn(task.run())
            })
            .collect();

        let results = future::join_all(handles).await;

        let outcomes: Vec<(Symbol, SymbolOutcome)> = unique
            .into_iter()
            .zip(results)
            .map(|(symbol, result)| {
                let outcome = result.unwrap_or_else(|e| {
                    tracing::error!(symbol = %symbol, error = %e, "Scan task panicked or was cancelled.");
                    SymbolOutcome::Failed(Error::TaskAborted {
                        symbol: symbol.0.clone(),
                        reason: e.to_string(),
                    })
                });
                (symbol, outcome)
            })
            .collect();

        let report = RunReport { outcomes };
        tracing::info!(
            scanned = report.outcomes.len(),
            alerted = report.alerted(),
            failed = report.failed(),
            "Scan complete."
        );
        report
    }

    /// Scans on every candle boundary (plus the configured delay), forever.
    pub async fn run_forever(&self, symbols: &[Symbol]) {
        loop {
            let now = Utc::now();
            let tick = schedule::next_tick(now, self.options.interval, self.options.tick_delay);
            let wait = (tick - now).to_std().unwrap_or_default();
            tracing::info!(next_tick = %tick, "Waiting for the next scan.");
            tokio::time::sleep(wait).await;

            self.run_once(symbols).await;
        }
    }
}
