// In crates/engine/src/schedule.rs

use std::time::Duration;

use chrono::{DateTime, Datelike, TimeDelta, TimeZone, Utc};
use core_types::Interval;

// 1970-01-01 was a Thursday; exchange weeks open on Monday.
const WEEK_ALIGNMENT_MS: i64 = 4 * 24 * 60 * 60 * 1000;

/// Open time of the candle that contains `now`.
pub fn candle_open(now: DateTime<Utc>, interval: Interval) -> DateTime<Utc> {
    match interval.duration_ms() {
        Some(length) => {
            let alignment = if interval == Interval::OneWeek {
                WEEK_ALIGNMENT_MS
            } else {
                0
            };
            let ms = now.timestamp_millis() - alignment;
            let open = ms.div_euclid(length) * length + alignment;
            Utc.timestamp_millis_opt(open).single().unwrap_or(now)
        }
        None => Utc
            .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
            .single()
            .unwrap_or(now),
    }
}

/// Open time of the candle after the one opening at `open`.
fn following_open(open: DateTime<Utc>, interval: Interval) -> DateTime<Utc> {
    match interval.duration_ms() {
        Some(length) => open + TimeDelta::milliseconds(length),
        None => {
            let (year, month) = if open.month() == 12 {
                (open.year() + 1, 1)
            } else {
                (open.year(), open.month() + 1)
            };
            Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
                .single()
                .unwrap_or(open)
        }
    }
}

/// The next scan time strictly after `now`: a candle boundary plus `delay`.
///
/// `delay` is expected to be shorter than one candle; a delay chrono cannot
/// represent is treated as zero.
pub fn next_tick(now: DateTime<Utc>, interval: Interval, delay: Duration) -> DateTime<Utc> {
    let delay = TimeDelta::from_std(delay).unwrap_or(TimeDelta::zero());
    let mut open = candle_open(now, interval);
    while open + delay <= now {
        open = following_open(open, interval);
    }
    open + delay
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    const FIVE_SECS: Duration = Duration::from_secs(5);

    #[test]
    fn four_hour_candles_are_epoch_aligned() {
        assert_eq!(
            candle_open(at(2024, 1, 1, 5, 17, 0), Interval::FourHours),
            at(2024, 1, 1, 4, 0, 0)
        );
    }

    #[test]
    fn tick_is_next_boundary_plus_delay() {
        let tick = next_tick(at(2024, 1, 1, 5, 0, 0), Interval::FourHours, FIVE_SECS);
        assert_eq!(tick, at(2024, 1, 1, 8, 0, 5));
    }

    #[test]
    fn tick_within_delay_uses_current_boundary() {
        let tick = next_tick(at(2024, 1, 1, 8, 0, 3), Interval::FourHours, FIVE_SECS);
        assert_eq!(tick, at(2024, 1, 1, 8, 0, 5));
    }

    #[test]
    fn tick_is_strictly_in_the_future() {
        let tick = next_tick(at(2024, 1, 1, 8, 0, 5), Interval::FourHours, FIVE_SECS);
        assert_eq!(tick, at(2024, 1, 1, 12, 0, 5));
    }

    #[test]
    fn weekly_ticks_land_on_monday() {
        // 2024-01-03 is a Wednesday; 2024-01-08 is the following Monday.
        let tick = next_tick(at(2024, 1, 3, 12, 0, 0), Interval::OneWeek, Duration::ZERO);
        assert_eq!(tick, at(2024, 1, 8, 0, 0, 0));
    }

    #[test]
    fn sub_millisecond_delay_is_kept() {
        let delay = Duration::from_micros(5_000_500);
        let tick = next_tick(at(2024, 1, 1, 5, 0, 0), Interval::FourHours, delay);
        assert_eq!(tick, at(2024, 1, 1, 8, 0, 5) + TimeDelta::microseconds(500));
    }

    #[test]
    fn unrepresentable_delay_falls_back_to_the_boundary() {
        let tick = next_tick(at(2024, 1, 1, 5, 0, 0), Interval::FourHours, Duration::MAX);
        assert_eq!(tick, at(2024, 1, 1, 8, 0, 0));
    }

    #[test]
    fn monthly_ticks_roll_over_the_year() {
        let tick = next_tick(at(2024, 12, 15, 0, 0, 0), Interval::OneMonth, FIVE_SECS);
        assert_eq!(tick, at(2025, 1, 1, 0, 0, 5));
    }
}
