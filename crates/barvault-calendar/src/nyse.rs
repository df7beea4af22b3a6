//! NYSE regular-session calendar.

use barvault_types::TimeRange;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc, Weekday};
use chrono_tz::America::New_York;

use crate::{TradingCalendar, clip_session};

/// Full-day closures, observed dates. Covers 2023 through 2026.
const HOLIDAYS: &[(i32, u32, u32)] = &[
    // 2023
    (2023, 1, 2),
    (2023, 1, 16),
    (2023, 2, 20),
    (2023, 4, 7),
    (2023, 5, 29),
    (2023, 6, 19),
    (2023, 7, 4),
    (2023, 9, 4),
    (2023, 11, 23),
    (2023, 12, 25),
    // 2024
    (2024, 1, 1),
    (2024, 1, 15),
    (2024, 2, 19),
    (2024, 3, 29),
    (2024, 5, 27),
    (2024, 6, 19),
    (2024, 7, 4),
    (2024, 9, 2),
    (2024, 11, 28),
    (2024, 12, 25),
    // 2025
    (2025, 1, 1),
    (2025, 1, 9), // national day of mourning
    (2025, 1, 20),
    (2025, 2, 17),
    (2025, 4, 18),
    (2025, 5, 26),
    (2025, 6, 19),
    (2025, 7, 4),
    (2025, 9, 1),
    (2025, 11, 27),
    (2025, 12, 25),
    // 2026
    (2026, 1, 1),
    (2026, 1, 19),
    (2026, 2, 16),
    (2026, 4, 3),
    (2026, 5, 25),
    (2026, 6, 19),
    (2026, 7, 3),
    (2026, 9, 7),
    (2026, 11, 26),
    (2026, 12, 25),
];

/// Sessions closing at 13:00 New York time.
const EARLY_CLOSES: &[(i32, u32, u32)] = &[
    (2023, 7, 3),
    (2023, 11, 24),
    (2024, 7, 3),
    (2024, 11, 29),
    (2024, 12, 24),
    (2025, 7, 3),
    (2025, 11, 28),
    (2025, 12, 24),
    (2026, 11, 27),
    (2026, 12, 24),
];

/// NYSE regular session: 09:30 to 16:00 America/New_York, Monday to Friday.
///
/// Daylight saving is handled through the tz database, so the UTC session
/// moves between 14:30-21:00 (winter) and 13:30-20:00 (summer). Holidays and
/// early closes come from a built-in table for 2023-2026; dates outside those
/// years only exclude weekends.
#[derive(Debug, Clone, Copy, Default)]
pub struct NyseCalendar;

impl NyseCalendar {
    /// Creates the calendar.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns true if the exchange opens on `date` (New York date).
    #[must_use]
    pub fn is_trading_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
            && !HOLIDAYS.contains(&(date.year(), date.month(), date.day()))
    }

    /// Returns the `[open, close)` UTC session for `date`, if it trades.
    #[must_use]
    pub fn session(&self, date: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        if !self.is_trading_day(date) {
            return None;
        }
        let close_hour = if EARLY_CLOSES.contains(&(date.year(), date.month(), date.day())) {
            13
        } else {
            16
        };
        let open = local_to_utc(date, NaiveTime::from_hms_opt(9, 30, 0)?)?;
        let close = local_to_utc(date, NaiveTime::from_hms_opt(close_hour, 0, 0)?)?;
        Some((open, close))
    }
}

impl TradingCalendar for NyseCalendar {
    fn name(&self) -> &str {
        "nyse"
    }

    fn expected_minutes(&self, range: &TimeRange) -> Vec<DateTime<Utc>> {
        if range.is_empty() {
            return Vec::new();
        }
        let first = range.start().with_timezone(&New_York).date_naive();
        let last = (range.end() - TimeDelta::nanoseconds(1))
            .with_timezone(&New_York)
            .date_naive();

        first
            .iter_days()
            .take_while(|d| *d <= last)
            .filter_map(|d| self.session(d))
            .flat_map(|(open, close)| clip_session(range, open, close))
            .collect()
    }
}

/// Session boundaries never fall in a DST gap, so `single` always resolves.
fn local_to_utc(date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    New_York
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}
