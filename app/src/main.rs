// In app/src/main.rs

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use api_client::{ApiClient, CandleSource};
use app_config::{ScannerConfig, Settings};
use clap::{Parser, Subcommand};
use core_types::{Interval, Symbol};
use engine::{Engine, ScanOptions};
use notifier::{AlertFormatter, ConsoleNotifier, Notifier, SlackNotifier};
use strategies::{MacdCrossover, Strategy};
use tracing_subscriber::prelude::*;

mod report;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Scans Binance symbols for MACD signal-line crossovers.")]
struct Cli {
    /// Directory holding `base.toml`, the environment overlay and `scanner.toml`.
    #[arg(long, global = true, default_value = "config")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scans on every candle close until interrupted.
    Run,

    /// Scans every configured symbol once and exits.
    Scan {
        /// Print alerts to stdout instead of sending them to Slack.
        #[arg(long)]
        dry_run: bool,
    },

    /// Prints the newest oscillator values for one symbol.
    Macd {
        /// The symbol to inspect (e.g., "OPUSDT").
        #[arg(short, long)]
        symbol: String,

        /// Kline interval; defaults to the scanner's interval.
        #[arg(short, long)]
        interval: Option<String>,

        /// How many of the newest points to print.
        #[arg(short, long, default_value_t = 5)]
        tail: usize,

        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let settings = app_config::load_settings_from(&cli.config_dir)
        .context("failed to load application settings")?;
    init_tracing(&settings.app.log_level);

    let scanner = app_config::load_scanner_config_from(&cli.config_dir.join("scanner.toml"))
        .context("failed to load scanner.toml")?;

    tracing::info!(
        environment = %settings.app.environment,
        symbols = scanner.scanner.symbols.len(),
        interval = %scanner.scanner.interval,
        "Starting MACD scanner"
    );

    match cli.command {
        Commands::Run => run_scanner(&settings, &scanner).await?,
        Commands::Scan { dry_run } => scan_once(&settings, &scanner, dry_run).await?,
        Commands::Macd {
            symbol,
            interval,
            tail,
            json,
        } => handle_macd(&settings, &scanner, symbol, interval, tail, json).await?,
    }

    Ok(())
}

fn init_tracing(log_level: &str) {
    let level = tracing::Level::from_str(log_level).unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(
        tracing_subscriber::filter::Targets::new()
            .with_target("reqwest", tracing::Level::WARN)
            .with_target("hyper", tracing::Level::WARN)
            .with_target("hyper_util", tracing::Level::WARN)
            .with_default(level),
    );
    tracing_subscriber::registry().with(fmt_layer).init();
}

// --- Component wiring ---

fn build_engine(settings: &Settings, scanner: &ScannerConfig, dry_run: bool) -> Result<Engine> {
    let source = ApiClient::new(&settings.binance)?;
    let strategy = MacdCrossover::new(settings.macd.clone())?;
    let notifier = build_notifier(settings, dry_run)?;

    let options = ScanOptions::from(&scanner.scanner);
    let mut formatter = AlertFormatter::new(settings.alerts.offset()?);
    if settings.alerts.label_interval {
        formatter = formatter.with_interval(options.interval);
    }

    tracing::info!(
        strategy = strategy.name(),
        notifier = notifier.name(),
        fast = settings.macd.fast_period,
        slow = settings.macd.slow_period,
        signal = settings.macd.signal_period,
        "Scanner components ready."
    );

    Ok(Engine::new(
        Arc::new(source),
        Arc::new(strategy),
        notifier,
        formatter,
        options,
    ))
}

fn build_notifier(settings: &Settings, dry_run: bool) -> Result<Arc<dyn Notifier>> {
    if dry_run {
        return Ok(Arc::new(ConsoleNotifier::new()));
    }
    if settings.slack.webhook_url.trim().is_empty() {
        tracing::warn!("No Slack webhook configured; alerts will be printed to stdout.");
        return Ok(Arc::new(ConsoleNotifier::new()));
    }
    Ok(Arc::new(SlackNotifier::new(&settings.slack)?))
}

// --- "Run" Subcommand Logic ---

/// Scans on every candle boundary until Ctrl-C.
async fn run_scanner(settings: &Settings, scanner: &ScannerConfig) -> Result<()> {
    let engine = build_engine(settings, scanner, false)?;
    let symbols = &scanner.scanner.symbols;

    tokio::select! {
        _ = engine.run_forever(symbols) => {
            anyhow::bail!("Scanner loop terminated unexpectedly.");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl-C")?;
            tracing::info!("Shutdown requested; stopping scanner.");
        }
    }

    Ok(())
}

// --- "Scan" Subcommand Logic ---

async fn scan_once(settings: &Settings, scanner: &ScannerConfig, dry_run: bool) -> Result<()> {
    let engine = build_engine(settings, scanner, dry_run)?;
    let report = engine.run_once(&scanner.scanner.symbols).await;

    if report.failed() > 0 {
        tracing::warn!(
            failed = report.failed(),
            scanned = report.outcomes.len(),
            "Some symbols could not be scanned or alerted."
        );
    }
    Ok(())
}

// --- "Macd" Subcommand Logic ---

async fn handle_macd(
    settings: &Settings,
    scanner: &ScannerConfig,
    symbol: String,
    interval: Option<String>,
    tail: usize,
    json: bool,
) -> Result<()> {
    let symbol = Symbol::parse(&symbol).context("symbol must not be empty")?;
    let interval = match interval {
        Some(raw) => Interval::from_str(&raw).map_err(anyhow::Error::msg)?,
        None => scanner.scanner.interval,
    };

    let client = ApiClient::new(&settings.binance)?;
    let strategy = MacdCrossover::new(settings.macd.clone())?;

    let series = client
        .get_candles(&symbol, interval, scanner.scanner.limit)
        .await?;
    let oscillator = strategy.oscillator(&series)?;
    let rows = report::rows(&oscillator, tail, settings.alerts.offset()?);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{} {} ({} candles)", symbol, interval, series.len());
        print!("{}", report::render_table(&rows));
    }

    match strategy.assess(&series)? {
        Some(event) => {
            let formatter = AlertFormatter::new(settings.alerts.offset()?).with_interval(interval);
            tracing::info!(alert = %formatter.format(&symbol, &event), "Crossover on the latest candle.");
        }
        None => tracing::info!(symbol = %symbol, "No crossover on the latest candle."),
    }

    Ok(())
}
