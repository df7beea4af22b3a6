//! Conversions from common instant representations to UTC.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::time::SystemTime;

use crate::InstantParseError;

/// Anything that can name a UTC instant.
///
/// Implemented for timezone-aware `chrono` datetimes, naive datetimes
/// (interpreted as UTC), `SystemTime`, and RFC 3339 strings such as
/// `"2025-01-02T14:30:00Z"`.
pub trait IntoUtcInstant {
    /// Converts `self` into a UTC instant.
    ///
    /// # Errors
    ///
    /// Returns an error if a string input is not a valid RFC 3339 instant.
    fn into_utc(self) -> Result<DateTime<Utc>, InstantParseError>;
}

impl<Tz: TimeZone> IntoUtcInstant for DateTime<Tz> {
    fn into_utc(self) -> Result<DateTime<Utc>, InstantParseError> {
        Ok(self.with_timezone(&Utc))
    }
}

impl IntoUtcInstant for NaiveDateTime {
    fn into_utc(self) -> Result<DateTime<Utc>, InstantParseError> {
        Ok(self.and_utc())
    }
}

impl IntoUtcInstant for SystemTime {
    fn into_utc(self) -> Result<DateTime<Utc>, InstantParseError> {
        Ok(DateTime::<Utc>::from(self))
    }
}

impl IntoUtcInstant for &str {
    fn into_utc(self) -> Result<DateTime<Utc>, InstantParseError> {
        DateTime::parse_from_rfc3339(self.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| InstantParseError {
                input: self.to_string(),
                reason: e.to_string(),
            })
    }
}

impl IntoUtcInstant for String {
    fn into_utc(self) -> Result<DateTime<Utc>, InstantParseError> {
        self.as_str().into_utc()
    }
}

impl IntoUtcInstant for &String {
    fn into_utc(self) -> Result<DateTime<Utc>, InstantParseError> {
        self.as_str().into_utc()
    }
}
