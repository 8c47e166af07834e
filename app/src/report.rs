// In app/src/report.rs

use chrono::FixedOffset;
use core_types::{OscillatorPoint, OscillatorSeries};
use serde::Serialize;

/// One oscillator row, as printed by the `macd` command.
#[derive(Debug, Serialize)]
pub struct OscillatorRow {
    pub open_time: String,
    pub close: String,
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    pub above: bool,
}

impl OscillatorRow {
    fn new(point: &OscillatorPoint, offset: FixedOffset) -> Self {
        Self {
            open_time: point
                .open_time
                .with_timezone(&offset)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            close: point.close.normalize().to_string(),
            macd: point.macd,
            signal: point.signal,
            histogram: point.histogram(),
            above: point.is_above_signal(),
        }
    }
}

/// The newest `tail` points of an oscillator, oldest first.
pub fn rows(oscillator: &OscillatorSeries, tail: usize, offset: FixedOffset) -> Vec<OscillatorRow> {
    oscillator
        .tail(tail)
        .iter()
        .map(|p| OscillatorRow::new(p, offset))
        .collect()
}

/// Renders rows as a fixed-width table.
pub fn render_table(rows: &[OscillatorRow]) -> String {
    let mut out = format!(
        "{:<16}  {:>14}  {:>12}  {:>12}  {:>12}  {}\n",
        "open", "close", "macd", "signal", "hist", "state"
    );
    for row in rows {
        out.push_str(&format!(
            "{:<16}  {:>14}  {:>12.6}  {:>12.6}  {:>12.6}  {}\n",
            row.open_time,
            row.close,
            row.macd,
            row.signal,
            row.histogram,
            if row.above { "above" } else { "below" }
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn point(hour: u32, macd: f64, signal: f64) -> OscillatorPoint {
        OscillatorPoint {
            open_time: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
            close: dec!(1.5000),
            macd,
            signal,
        }
    }

    #[test]
    fn keeps_only_the_tail() {
        let oscillator = OscillatorSeries::new(vec![
            point(0, 0.0, 0.0),
            point(4, -0.1, 0.0),
            point(8, 0.2, 0.1),
        ]);
        let rows = rows(&oscillator, 2, FixedOffset::east_opt(0).unwrap());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].open_time, "2024-01-01 04:00");
        assert!(!rows[0].above);
        assert!(rows[1].above);
        assert_eq!(rows[1].close, "1.5");
    }

    #[test]
    fn table_has_header_and_one_line_per_row() {
        let oscillator = OscillatorSeries::new(vec![point(0, 0.5, 0.25)]);
        let table = render_table(&rows(&oscillator, 10, FixedOffset::east_opt(0).unwrap()));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("open"));
        assert!(lines[1].contains("0.250000"));
        assert!(lines[1].ends_with("above"));
    }
}
