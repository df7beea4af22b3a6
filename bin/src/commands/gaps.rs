//! Gaps command implementation.

use crate::display::{CalendarKind, parse_instant};
use anyhow::{Context, Result};
use barvault_lib::find_gaps_in_store;
use barvault_lib::prelude::*;

/// Print the calendar minutes missing from the archive.
pub(crate) fn gaps(
    archive: &ArchiveConfig,
    symbols: &[String],
    start: &str,
    end: &str,
    calendar: CalendarKind,
    list: bool,
) -> Result<()> {
    let range = TimeRange::new(parse_instant(start)?, parse_instant(end)?)?;
    let store = open_store(archive).with_context(|| format!("Failed to open {archive}"))?;
    let calendar = calendar.build();

    let report = find_gaps_in_store(&*store, &*calendar, &range, symbols)?;

    if list {
        for (symbol, missing) in report.iter() {
            for ts in missing {
                println!("{symbol}\t{}", ts.format("%Y-%m-%dT%H:%M:%SZ"));
            }
        }
        return Ok(());
    }

    println!(
        "{:<12} {:>8} {:<22} {:<22}",
        "SYMBOL", "MISSING", "FIRST", "LAST"
    );
    println!("{}", "-".repeat(66));
    for (symbol, missing) in report.iter() {
        let fmt = |ts: Option<&chrono::DateTime<chrono::Utc>>| {
            ts.map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        };
        println!(
            "{:<12} {:>8} {:<22} {:<22}",
            symbol,
            missing.len(),
            fmt(missing.first()),
            fmt(missing.last())
        );
    }
    println!("\nTotal missing: {} minutes", report.total_missing());
    Ok(())
}
