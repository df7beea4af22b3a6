//! Half-open time ranges and minute iteration.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crate::RangeError;

/// A half-open UTC time range `[start, end)`.
///
/// Every read, fetch and gap computation in barvault uses this convention:
/// a bar stamped exactly at `end` is never part of the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Creates a new range, validating that start <= end.
    ///
    /// `start == end` is a valid, empty range.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Start of the range (inclusive).
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the range (exclusive).
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns true if the range covers no instant.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if `ts` lies in `[start, end)`.
    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts < self.end
    }

    /// Returns an iterator over every minute-aligned instant in the range.
    pub fn minutes(&self) -> MinuteIterator {
        MinuteIterator::new(self.start, self.end)
    }

    /// Returns the UTC calendar dates the range touches, ascending.
    #[must_use]
    pub fn days(&self) -> Vec<NaiveDate> {
        if self.is_empty() {
            return Vec::new();
        }
        let last = (self.end - TimeDelta::nanoseconds(1)).date_naive();
        self.start
            .date_naive()
            .iter_days()
            .take_while(|d| *d <= last)
            .collect()
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.start.format("%Y-%m-%dT%H:%M:%SZ"),
            self.end.format("%Y-%m-%dT%H:%M:%SZ")
        )
    }
}

/// Iterator over minute-aligned instants in a half-open range.
#[derive(Debug, Clone)]
pub struct MinuteIterator {
    current: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl MinuteIterator {
    fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            current: ceil_to_minute(start),
            end,
        }
    }
}

impl Iterator for MinuteIterator {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.end {
            return None;
        }

        let result = self.current;
        self.current += TimeDelta::minutes(1);
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.current >= self.end {
            return (0, Some(0));
        }
        let span = self.end - self.current;
        let mut minutes = span.num_minutes() as usize;
        if span > TimeDelta::minutes(minutes as i64) {
            minutes += 1;
        }
        (minutes, Some(minutes))
    }
}

impl ExactSizeIterator for MinuteIterator {}

/// Rounds a timestamp up to the next minute boundary (identity when aligned).
fn ceil_to_minute(ts: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = ts.timestamp_subsec_nanos();
    let secs = ts.timestamp();
    if secs.rem_euclid(60) == 0 && nanos == 0 {
        return ts;
    }
    let floor = secs - secs.rem_euclid(60);
    DateTime::from_timestamp(floor + 60, 0).unwrap_or(ts)
}
