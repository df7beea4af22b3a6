//! Trading session calendars for the barvault minute-bar archive.
//!
//! - [`TradingCalendar`] - Capability trait: expected session minutes in a range
//! - [`NyseCalendar`] - NYSE regular session (America/New_York, DST-aware)
//! - [`WeekdayCalendar`] - Weekdays with a fixed UTC session window
//! - [`AlwaysOpenCalendar`] - Every minute is a session minute

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barvault/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod nyse;
mod simple;

pub use nyse::NyseCalendar;
pub use simple::{AlwaysOpenCalendar, WeekdayCalendar};

use barvault_types::TimeRange;
use chrono::{DateTime, Utc};

/// Supplies the trading minutes a complete archive should contain.
pub trait TradingCalendar: Send + Sync {
    /// Short identifier used in logs (e.g., "nyse").
    fn name(&self) -> &str;

    /// Returns every expected session minute in `range`, ascending.
    ///
    /// Must be deterministic for the same range. An empty vector means the
    /// range lies entirely outside trading sessions.
    fn expected_minutes(&self, range: &TimeRange) -> Vec<DateTime<Utc>>;
}

impl<C: TradingCalendar + ?Sized> TradingCalendar for &C {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn expected_minutes(&self, range: &TimeRange) -> Vec<DateTime<Utc>> {
        (**self).expected_minutes(range)
    }
}

impl<C: TradingCalendar + ?Sized> TradingCalendar for std::sync::Arc<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn expected_minutes(&self, range: &TimeRange) -> Vec<DateTime<Utc>> {
        (**self).expected_minutes(range)
    }
}

/// Minutes of `[session_open, session_close)` that also fall in `range`.
fn clip_session(
    range: &TimeRange,
    session_open: DateTime<Utc>,
    session_close: DateTime<Utc>,
) -> impl Iterator<Item = DateTime<Utc>> {
    let start = range.start().max(session_open);
    let end = range.end().min(session_close);
    TimeRange::new(start, end)
        .map(|r| r.minutes())
        .into_iter()
        .flatten()
}
