//! Resampling timeframe definitions.
//!
//! A [`Timeframe`] can only be obtained from [`Timeframe::resolve`] (or its
//! [`FromStr`] impl) or the [`Timeframe::BASE`] constant. Resolution is a
//! closed allow-list: short codes such as `1m` are rejected outright because
//! general-purpose duration parsers disagree on whether they mean minutes or
//! months.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Serialize, Serializer};
use std::str::FromStr;

use crate::TimeframeError;

/// Accepted specifiers and their width in minutes. Canonical label first.
const ALLOWED: &[(&str, u32)] = &[
    ("1min", 1),
    ("2min", 2),
    ("3min", 3),
    ("5min", 5),
    ("10min", 10),
    ("15min", 15),
    ("30min", 30),
    ("1h", 60),
    ("60min", 60),
    ("2h", 120),
    ("4h", 240),
    ("1d", 1440),
];

/// A validated, unambiguous bar width.
///
/// Windows are aligned to multiples of the width counted from the Unix epoch
/// and labelled by their start instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timeframe {
    label: &'static str,
    minutes: u32,
}

impl Timeframe {
    /// The archive's base timeframe (1 minute).
    pub const BASE: Self = Self {
        label: "1min",
        minutes: 1,
    };

    /// Resolves a timeframe specifier against the allow-list.
    ///
    /// Matching ignores surrounding whitespace and ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`TimeframeError::AmbiguousOrUnknown`] for anything outside the
    /// allow-list, including `1m`.
    pub fn resolve(spec: &str) -> Result<Self, TimeframeError> {
        let normalized = spec.trim().to_ascii_lowercase();
        ALLOWED
            .iter()
            .find(|(name, _)| *name == normalized)
            .map(|&(_, minutes)| Self::canonical(minutes))
            .ok_or_else(|| TimeframeError::AmbiguousOrUnknown(spec.to_string()))
    }

    /// Canonical (first-listed) entry for a width.
    fn canonical(minutes: u32) -> Self {
        let label = ALLOWED
            .iter()
            .find(|(_, m)| *m == minutes)
            .map_or("1min", |(name, _)| *name);
        Self { label, minutes }
    }

    /// Returns the canonical label (e.g., "5min", "1h").
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.label
    }

    /// Returns the width in minutes.
    #[must_use]
    pub const fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Returns the width in seconds.
    #[must_use]
    pub const fn seconds(&self) -> i64 {
        self.minutes as i64 * 60
    }

    /// Returns the width as a duration.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.minutes))
    }

    /// Returns true for the 1-minute base timeframe.
    #[must_use]
    pub const fn is_base(&self) -> bool {
        self.minutes == 1
    }

    /// Returns the start of the window containing `ts`.
    #[must_use]
    pub fn window_start(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let width = self.seconds();
        let floored = ts.timestamp().div_euclid(width) * width;
        DateTime::from_timestamp(floored, 0).unwrap_or(ts)
    }

    /// Returns the canonical labels of all accepted widths.
    #[must_use]
    pub fn supported() -> Vec<&'static str> {
        let mut labels: Vec<&'static str> = Vec::new();
        for &(name, minutes) in ALLOWED {
            if Self::canonical(minutes).label == name {
                labels.push(name);
            }
        }
        labels
    }

    /// Returns every accepted specifier, aliases included.
    #[must_use]
    pub fn accepted_specs() -> impl Iterator<Item = &'static str> {
        ALLOWED.iter().map(|(name, _)| *name)
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Self::BASE
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}

impl Serialize for Timeframe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label)
    }
}
