//! Synthetic workloads for barvault benchmarks.
//!
//! Run with: `cargo bench --package barvault-bench`

use barvault_types::Bar;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};

/// Session open used by every workload: 2025-01-02 14:30 UTC (09:30 New York).
#[must_use]
pub fn session_open() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 2, 14, 30, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Ascending 1-minute bars for one symbol, `minutes` long from `start`.
///
/// Prices follow a deterministic saw-tooth so aggregation has real highs and
/// lows to find.
#[must_use]
pub fn synthetic_bars(symbol: &str, start: DateTime<Utc>, minutes: usize) -> Vec<Bar> {
    (0..minutes)
        .map(|i| {
            let step = (i % 37) as f64;
            let open = 100.0 + step * 0.05;
            Bar::new(
                symbol,
                start + TimeDelta::minutes(i as i64),
                open,
                open + 0.12,
                open - 0.08,
                open + 0.03,
                1_000.0 + (i % 101) as f64,
            )
        })
        .collect()
}

/// `minutes` bars for each of `symbols`, ordered by symbol then time.
#[must_use]
pub fn synthetic_universe(symbols: &[&str], start: DateTime<Utc>, minutes: usize) -> Vec<Bar> {
    let mut sorted = symbols.to_vec();
    sorted.sort_unstable();
    sorted
        .iter()
        .flat_map(|symbol| synthetic_bars(symbol, start, minutes))
        .collect()
}

/// Every other bar of `bars`, leaving a gap at each odd minute.
#[must_use]
pub fn with_holes(bars: &[Bar]) -> Vec<Bar> {
    bars.iter().step_by(2).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_bars_are_minute_spaced() {
        let bars = synthetic_bars("AAPL", session_open(), 390);
        assert_eq!(bars.len(), 390);
        assert!(bars.iter().all(Bar::is_minute_aligned));
        assert_eq!(bars[389].timestamp - bars[0].timestamp, TimeDelta::minutes(389));
    }

    #[test]
    fn test_universe_order() {
        let bars = synthetic_universe(&["MSFT", "AAPL"], session_open(), 3);
        assert_eq!(bars[0].symbol, "AAPL");
        assert_eq!(bars[3].symbol, "MSFT");
        assert_eq!(with_holes(&bars).len(), 3);
    }
}
