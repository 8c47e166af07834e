// In crates/strategies/src/macd.rs

use core_types::{OscillatorPoint, OscillatorSeries, PriceSeries};

use crate::ema::{EmaConvention, ewm_mean};
use crate::error::{Error, Result};
use crate::types::MacdSettings;

/// MACD line (fast EMA - slow EMA) and its signal line, one value per input.
pub fn macd_lines(
    values: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    convention: EmaConvention,
) -> (Vec<f64>, Vec<f64>) {
    let fast = ewm_mean(values, fast_period, convention);
    let slow = ewm_mean(values, slow_period, convention);
    let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = ewm_mean(&macd, signal_period, convention);
    (macd, signal)
}

/// Computes the oscillator over a whole price series.
///
/// The result has exactly one point per candle, carrying the candle's open time
/// and close price. Fails only on an empty series or a zero span.
pub fn compute(series: &PriceSeries, settings: &MacdSettings) -> Result<OscillatorSeries> {
    settings.validate()?;
    if series.is_empty() {
        return Err(Error::EmptySeries);
    }

    let values = series.values(settings.price_field);
    let (macd, signal) = macd_lines(
        &values,
        settings.fast_period,
        settings.slow_period,
        settings.signal_period,
        settings.convention(),
    );

    let points = series
        .candles()
        .iter()
        .zip(macd.into_iter().zip(signal))
        .map(|(candle, (macd, signal))| OscillatorPoint {
            open_time: candle.open_time,
            close: candle.close,
            macd,
            signal,
        })
        .collect();

    Ok(OscillatorSeries::new(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use core_types::{Candle, Interval, PriceField, Symbol};
    use rust_decimal::Decimal;

    const PRICES: [&str; 10] = [
        "10", "11", "10.5", "12", "11.8", "12.4", "13", "12.2", "12.9", "13.5",
    ];

    fn series_from(prices: &[&str]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let candles = prices
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let close: Decimal = p.parse().unwrap();
                let open_time = start + Duration::hours(4 * i as i64);
                Candle {
                    open_time,
                    open: close,
                    high: close + Decimal::ONE,
                    low: close - Decimal::ONE,
                    close,
                    volume: Decimal::from(100 + i as i64),
                    close_time: open_time + Duration::hours(4) - Duration::milliseconds(1),
                    trade_count: 10,
                }
            })
            .collect();
        PriceSeries::new(Symbol("OPUSDT".into()), Interval::FourHours, candles).unwrap()
    }

    fn small_spans() -> MacdSettings {
        MacdSettings {
            fast_period: 3,
            slow_period: 6,
            signal_period: 4,
            ..MacdSettings::default()
        }
    }

    #[test]
    fn output_is_index_aligned_with_input() {
        let series = series_from(&PRICES);
        let osc = compute(&series, &MacdSettings::default()).unwrap();

        assert_eq!(osc.len(), series.len());
        for (point, candle) in osc.points().iter().zip(series.candles()) {
            assert_eq!(point.open_time, candle.open_time);
            assert_eq!(point.close, candle.close);
        }
    }

    #[test]
    fn single_candle_is_defined() {
        let osc = compute(&series_from(&["7.25"]), &MacdSettings::default()).unwrap();
        assert_eq!(osc.len(), 1);
        assert_eq!(osc.points()[0].macd, 0.0);
        assert_eq!(osc.points()[0].signal, 0.0);
    }

    #[test]
    fn adjusted_golden_values() {
        // fast=3, slow=6, signal=4, adjusted weighting.
        let macd = [
            0.0,
            0.08333333333333393,
            0.025557011795545037,
            0.22578828828829067,
            0.2236161474223266,
            0.29731855809837526,
            0.392940529081784,
            0.21371381212673413,
            0.2599890982023183,
            0.36193166633059626,
        ];
        let signal = [
            0.0,
            0.0520833333333337,
            0.03854949581405377,
            0.12459673500258174,
            0.16754408598269316,
            0.2219943042106076,
            0.2923420817030918,
            0.26035348834025157,
            0.2602062484461868,
            0.30114395022804835,
        ];

        let osc = compute(&series_from(&PRICES), &small_spans()).unwrap();
        for (i, point) in osc.points().iter().enumerate() {
            assert!((point.macd - macd[i]).abs() < 1e-12, "macd[{i}] = {}", point.macd);
            assert!((point.signal - signal[i]).abs() < 1e-12, "signal[{i}] = {}", point.signal);
        }
    }

    #[test]
    fn compute_is_idempotent() {
        let series = series_from(&PRICES);
        let first = compute(&series, &MacdSettings::default()).unwrap();
        let second = compute(&series, &MacdSettings::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn price_field_selects_input() {
        let series = series_from(&PRICES);
        let on_close = compute(&series, &small_spans()).unwrap();
        let on_high = compute(
            &series,
            &MacdSettings {
                price_field: PriceField::High,
                ..small_spans()
            },
        )
        .unwrap();
        // High is close shifted by a constant, so the oscillator is unchanged.
        for (a, b) in on_close.points().iter().zip(on_high.points()) {
            assert!((a.macd - b.macd).abs() < 1e-9);
        }

        let on_volume = compute(
            &series,
            &MacdSettings {
                price_field: PriceField::Volume,
                ..small_spans()
            },
        )
        .unwrap();
        assert_ne!(on_close.points()[5].macd, on_volume.points()[5].macd);
    }

    #[test]
    fn convention_changes_warm_up_values() {
        let series = series_from(&PRICES);
        let adjusted = compute(&series, &small_spans()).unwrap();
        let recursive = compute(
            &series,
            &MacdSettings {
                adjust: false,
                ..small_spans()
            },
        )
        .unwrap();
        assert_ne!(adjusted.points()[1].macd, recursive.points()[1].macd);
    }

    #[test]
    fn empty_series_is_an_error() {
        let empty = PriceSeries::new(Symbol("X".into()), Interval::OneHour, vec![]).unwrap();
        assert_eq!(compute(&empty, &MacdSettings::default()), Err(Error::EmptySeries));
    }

    #[test]
    fn zero_span_is_an_error() {
        let settings = MacdSettings {
            signal_period: 0,
            ..MacdSettings::default()
        };
        assert_eq!(
            compute(&series_from(&PRICES), &settings),
            Err(Error::InvalidPeriod {
                name: "signal_period",
                value: 0
            })
        );
    }

    #[test]
    fn inverted_spans_still_compute() {
        let settings = MacdSettings {
            fast_period: 6,
            slow_period: 3,
            ..small_spans()
        };
        let normal = compute(&series_from(&PRICES), &small_spans()).unwrap();
        let inverted = compute(&series_from(&PRICES), &settings).unwrap();
        for (a, b) in normal.points().iter().zip(inverted.points()) {
            assert!((a.macd + b.macd).abs() < 1e-12);
        }
    }
}
