//! Bar (OHLCV) representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLCV bar for one symbol.
///
/// Bars are plain values. Merging or resampling always produces new bars;
/// nothing in the archive edits a bar in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Instrument identifier (e.g., "AAPL").
    pub symbol: String,
    /// Bar open time (UTC). Minute-aligned for base bars.
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,
    /// Opening price.
    pub open: f64,
    /// Highest price during the bar.
    pub high: f64,
    /// Lowest price during the bar.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume.
    pub volume: f64,
}

impl Bar {
    /// Creates a new bar.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Returns the storage key of this bar.
    #[must_use]
    pub fn key(&self) -> (&str, DateTime<Utc>) {
        (&self.symbol, self.timestamp)
    }

    /// Returns true if the timestamp sits exactly on a minute boundary.
    #[must_use]
    pub fn is_minute_aligned(&self) -> bool {
        self.timestamp.timestamp() % 60 == 0 && self.timestamp.timestamp_subsec_nanos() == 0
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Orders bars by (symbol, timestamp), the archive's canonical read order.
    #[must_use]
    pub fn canonical_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.symbol
            .cmp(&other.symbol)
            .then(self.timestamp.cmp(&other.timestamp))
    }
}

impl std::fmt::Display for Bar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} o={} h={} l={} c={} v={}",
            self.symbol,
            self.timestamp.format("%Y-%m-%dT%H:%M:%SZ"),
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume
        )
    }
}
