//! Calendar-aware gap detection.

use barvault_calendar::TradingCalendar;
use barvault_store::BarStore;
use barvault_types::{Bar, StorageError, TimeRange};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Missing expected minutes per symbol.
///
/// Every requested symbol has an entry; a complete symbol maps to an empty
/// list. Lists are ascending and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GapReport {
    gaps: BTreeMap<String, Vec<DateTime<Utc>>>,
}

impl GapReport {
    /// Returns the missing minutes for `symbol` (empty if none or unknown).
    #[must_use]
    pub fn missing(&self, symbol: &str) -> &[DateTime<Utc>] {
        self.gaps.get(symbol).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns true if no symbol is missing any minute.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.gaps.values().all(Vec::is_empty)
    }

    /// Returns the symbols with at least one missing minute, sorted.
    #[must_use]
    pub fn symbols_with_gaps(&self) -> Vec<&str> {
        self.gaps
            .iter()
            .filter(|(_, missing)| !missing.is_empty())
            .map(|(symbol, _)| symbol.as_str())
            .collect()
    }

    /// Returns the number of missing minutes across all symbols.
    #[must_use]
    pub fn total_missing(&self) -> usize {
        self.gaps.values().map(Vec::len).sum()
    }

    /// Returns every reported symbol, sorted.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.gaps.keys().map(String::as_str)
    }

    /// Iterates `(symbol, missing)` pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DateTime<Utc>])> {
        self.gaps.iter().map(|(s, m)| (s.as_str(), m.as_slice()))
    }
}

/// Computes, per symbol, the calendar-expected minutes of `range` that have no
/// bar in `bars`.
///
/// Matching is exact on timestamps. Bars outside `range` or for other
/// symbols are ignored.
#[must_use]
pub fn find_gaps<C, S>(bars: &[Bar], calendar: &C, range: &TimeRange, symbols: &[S]) -> GapReport
where
    C: TradingCalendar + ?Sized,
    S: AsRef<str>,
{
    let mut expected = calendar.expected_minutes(range);
    expected.sort_unstable();
    expected.dedup();

    let gaps = symbols
        .iter()
        .map(|symbol| {
            let symbol = symbol.as_ref();
            let present: HashSet<DateTime<Utc>> = bars
                .iter()
                .filter(|bar| bar.symbol == symbol && range.contains(bar.timestamp))
                .map(|bar| bar.timestamp)
                .collect();
            let missing = expected
                .iter()
                .copied()
                .filter(|ts| !present.contains(ts))
                .collect();
            (symbol.to_string(), missing)
        })
        .collect();

    GapReport { gaps }
}

/// Reads `symbols` over `range` from `store` and reports their gaps.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn find_gaps_in_store<S, C>(
    store: &S,
    calendar: &C,
    range: &TimeRange,
    symbols: &[String],
) -> Result<GapReport, StorageError>
where
    S: BarStore + ?Sized,
    C: TradingCalendar + ?Sized,
{
    let present = store.read(symbols, range)?;
    let report = find_gaps(&present, calendar, range, symbols);
    tracing::debug!(
        calendar = calendar.name(),
        symbols = symbols.len(),
        missing = report.total_missing(),
        "gap scan"
    );
    Ok(report)
}
