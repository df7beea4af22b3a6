//! Calendars without an exchange holiday table.

use barvault_types::TimeRange;
use chrono::{DateTime, Datelike, NaiveTime, TimeDelta, Utc, Weekday};

use crate::{TradingCalendar, clip_session};

/// Every minute is a session minute (24/7 markets).
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOpenCalendar;

impl AlwaysOpenCalendar {
    /// Creates the calendar.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TradingCalendar for AlwaysOpenCalendar {
    fn name(&self) -> &str {
        "always-open"
    }

    fn expected_minutes(&self, range: &TimeRange) -> Vec<DateTime<Utc>> {
        range.minutes().collect()
    }
}

/// Monday to Friday with one fixed `[open, close)` session in UTC.
#[derive(Debug, Clone, Copy)]
pub struct WeekdayCalendar {
    open: NaiveTime,
    close: NaiveTime,
}

impl WeekdayCalendar {
    /// Creates a weekday calendar with the given UTC session times.
    ///
    /// Returns `None` if `open` is not strictly before `close`.
    #[must_use]
    pub fn new(open: NaiveTime, close: NaiveTime) -> Option<Self> {
        (open < close).then_some(Self { open, close })
    }

    /// Returns the session open (UTC).
    #[must_use]
    pub const fn open(&self) -> NaiveTime {
        self.open
    }

    /// Returns the session close (UTC).
    #[must_use]
    pub const fn close(&self) -> NaiveTime {
        self.close
    }
}

impl TradingCalendar for WeekdayCalendar {
    fn name(&self) -> &str {
        "weekday"
    }

    fn expected_minutes(&self, range: &TimeRange) -> Vec<DateTime<Utc>> {
        if range.is_empty() {
            return Vec::new();
        }
        let first = range.start().date_naive();
        let last = (range.end() - TimeDelta::nanoseconds(1)).date_naive();

        first
            .iter_days()
            .take_while(|d| *d <= last)
            .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
            .flat_map(|d| {
                let open = d.and_time(self.open).and_utc();
                let close = d.and_time(self.close).and_utc();
                clip_session(range, open, close)
            })
            .collect()
    }
}
